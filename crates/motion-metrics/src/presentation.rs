//! Render-ready tables for the external chart sink.
//!
//! Nothing here draws anything. The presenter shapes the cleaned table and
//! movement totals into three chart descriptions (location timeline,
//! movement bars and a 3D scatter of one keypoint) that a plotting
//! frontend can consume as-is.

use motion_core::{CleanedTable, Frame, Keypoint, Result};
use serde::Serialize;

use crate::location::{LocationMetric, LocationSeries};
use crate::movement::MovementTotals;

/// Line colour per keypoint in the timeline chart
pub fn line_color(keypoint: Keypoint) -> &'static str {
    match keypoint {
        Keypoint::Nosetip => "black",
        Keypoint::RightWhiskers => "red",
        Keypoint::LeftWhiskers => "yellow",
        Keypoint::RightEar => "green",
        Keypoint::LeftEar => "blue",
    }
}

/// One line of the timeline chart
#[derive(Debug, Clone, Serialize)]
pub struct LineSeries {
    pub keypoint: Keypoint,
    /// Column label, `<keypoint>_location`
    pub label: String,
    pub color: &'static str,
    pub series: LocationSeries,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationTimeline {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub lines: Vec<LineSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bar {
    pub keypoint: Keypoint,
    pub label: &'static str,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovementChart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub bars: Vec<Bar>,
}

/// `(x, y, location)` for one cleaned frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub frame: Frame,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scatter3D {
    pub keypoint: Keypoint,
    pub title: String,
    pub axis_labels: [&'static str; 3],
    pub color: &'static str,
    pub marker: &'static str,
    pub points: Vec<ScatterPoint>,
}

/// Everything the chart sink needs for one run
#[derive(Debug, Clone, Serialize)]
pub struct PresentationData {
    pub timeline: LocationTimeline,
    pub movement: MovementChart,
    pub scatter: Scatter3D,
}

/// Builds [`PresentationData`]
#[derive(Debug, Clone, Default)]
pub struct Presenter {
    pub metric: LocationMetric,
    pub scatter_keypoint: Keypoint,
}

impl Presenter {
    pub fn new(metric: LocationMetric, scatter_keypoint: Keypoint) -> Self {
        Self {
            metric,
            scatter_keypoint,
        }
    }

    pub fn build(&self, cleaned: &CleanedTable, movement: &MovementTotals) -> Result<PresentationData> {
        Ok(PresentationData {
            timeline: self.timeline(cleaned)?,
            movement: self.movement_chart(movement),
            scatter: self.scatter(cleaned)?,
        })
    }

    /// Location series of every keypoint over the cleaned coordinates
    pub fn timeline(&self, cleaned: &CleanedTable) -> Result<LocationTimeline> {
        let mut lines = Vec::with_capacity(Keypoint::COUNT);
        for keypoint in Keypoint::ALL {
            lines.push(LineSeries {
                keypoint,
                label: format!("{}_location", keypoint.label()),
                color: line_color(keypoint),
                series: self.metric.compute(cleaned.x(keypoint)?, cleaned.y(keypoint)?)?,
            });
        }

        Ok(LocationTimeline {
            title: "Body parts location in time",
            x_label: "Time (frames)",
            y_label: "Coordinates",
            lines,
        })
    }

    pub fn movement_chart(&self, movement: &MovementTotals) -> MovementChart {
        MovementChart {
            title: "Body parts movement",
            x_label: "Shrew body parts",
            y_label: "Total movement",
            bars: movement
                .iter()
                .map(|(keypoint, height)| Bar {
                    keypoint,
                    label: keypoint.display_name(),
                    height,
                })
                .collect(),
        }
    }

    /// One point per cleaned frame; `z` is the same-frame location value
    pub fn scatter(&self, cleaned: &CleanedTable) -> Result<Scatter3D> {
        let keypoint = self.scatter_keypoint;
        let (x, y) = (cleaned.x(keypoint)?, cleaned.y(keypoint)?);
        let series = self.metric.compute(x, y)?;

        let points = cleaned
            .frames()
            .iter()
            .enumerate()
            .filter_map(|(i, &frame)| {
                Some(ScatterPoint {
                    frame,
                    x: x[i],
                    y: y[i],
                    z: series.frame_value(i)?,
                })
            })
            .collect();

        Ok(Scatter3D {
            keypoint,
            title: format!("{} 3D movement", capitalize(keypoint.display_name())),
            axis_labels: ["X_coordinates", "Y_coordinates", "Z_coordinates"],
            color: "magenta",
            marker: "o",
            points,
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::tests::cleaned_table;
    use crate::delta::DeltaComputer;
    use crate::movement::MovementAggregator;

    fn fixture() -> (CleanedTable, MovementTotals) {
        let cleaned = cleaned_table(
            &[
                (Keypoint::Nosetip, vec![1.0, 2.0], vec![3.0, 4.0]),
                (Keypoint::LeftEar, vec![-1.0, 0.0], vec![0.5, 1.0]),
            ],
            2,
        );
        let deltas = DeltaComputer::new().compute(&cleaned).unwrap();
        let totals = MovementAggregator::default().aggregate(&deltas).unwrap();
        (cleaned, totals)
    }

    #[test]
    fn test_timeline_uses_cleaned_coordinates() {
        let (cleaned, totals) = fixture();
        let data = Presenter::default().build(&cleaned, &totals).unwrap();

        assert_eq!(data.timeline.lines.len(), Keypoint::COUNT);
        let nose = &data.timeline.lines[0];
        assert_eq!(nose.label, "Nosetip_location");
        assert_eq!(nose.color, "black");
        assert_eq!(nose.series.to_vec(), vec![10.0, 17.0, 11.0, 18.0]);
    }

    #[test]
    fn test_bars_follow_enumeration_order() {
        let (cleaned, totals) = fixture();
        let data = Presenter::default().build(&cleaned, &totals).unwrap();

        let labels: Vec<&str> = data.movement.bars.iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            vec!["Nose tip", "right whiskers", "left whiskers", "right ear", "left ear"]
        );
        // Nosetip delta (-1, -1): |-1| + 1 = 2
        assert_eq!(data.movement.bars[0].height, 2.0);
    }

    #[test]
    fn test_scatter_pairs_same_frame_values() {
        let (cleaned, totals) = fixture();
        let data = Presenter::default().build(&cleaned, &totals).unwrap();

        assert_eq!(data.scatter.title, "Nose tip 3D movement");
        assert_eq!(
            data.scatter.points,
            vec![
                ScatterPoint {
                    frame: Frame(0),
                    x: 1.0,
                    y: 3.0,
                    z: 10.0,
                },
                ScatterPoint {
                    frame: Frame(1),
                    x: 2.0,
                    y: 4.0,
                    z: 18.0,
                },
            ]
        );

        let left_ear = Presenter::new(LocationMetric::CrossProduct, Keypoint::LeftEar)
            .scatter(&cleaned)
            .unwrap();
        assert_eq!(left_ear.title, "Left ear 3D movement");
        assert_eq!(left_ear.points[0].z, 1.25);
    }

    #[test]
    fn test_presentation_serializes() {
        let (cleaned, totals) = fixture();
        let data = Presenter::default().build(&cleaned, &totals).unwrap();
        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(json["timeline"]["lines"][0]["series"]["shape"][0], 2);
        assert_eq!(json["movement"]["bars"][4]["keypoint"], "leftear");
        assert_eq!(json["scatter"]["points"].as_array().unwrap().len(), 2);
    }
}
