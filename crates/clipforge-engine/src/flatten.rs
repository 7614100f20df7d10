//! Timeline flattening: derive absolute start times from clip order.
//!
//! Flattening is a pure function of project state. Absolute times are never
//! persisted, only recomputed, so reordering or trimming clips re-times
//! everything downstream with no separate re-layout step.

use clipforge_timeline::{Clip, ClipKind, Project, Track};

/// A clip with its computed timeline position.
#[derive(Debug, Clone, Copy)]
pub struct PlacedClip<'a> {
    pub clip: &'a Clip,
    /// Absolute start time in seconds, local to the owning track's clock.
    pub start: f64,
    /// Index of the owning track in the project (layer order, 0 = bottom).
    pub track_index: usize,
    pub track: &'a Track,
}

/// Flatten the track/clip tree into layer-ordered placed clips.
///
/// Tracks are walked in project order (first = bottom layer). Invisible
/// tracks are skipped entirely and do not affect other tracks' timing:
/// every track keeps its own independent running clock starting at 0.0.
/// Gap clips advance the clock but are not emitted.
pub fn flatten(project: &Project) -> Vec<PlacedClip<'_>> {
    let mut placed = Vec::new();
    for (track_index, track) in project.tracks.iter().enumerate() {
        if !track.visible {
            continue;
        }
        let mut current_time = 0.0;
        for clip in &track.clips {
            if clip.kind != ClipKind::Gap {
                placed.push(PlacedClip {
                    clip,
                    start: current_time,
                    track_index,
                    track,
                });
            }
            current_time += clip.duration;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_core::Rgb;
    use clipforge_timeline::TrackKind;

    fn text_clip(id: &str, secs: f64) -> Clip {
        Clip::new(id, ClipKind::Text, Some("t".into()), secs).unwrap()
    }

    fn project() -> Project {
        let mut project = Project::new("Flat", (1920, 1080), 30, Rgb::BLACK).unwrap();
        let mut text = Track::new("t1", "Text 1", TrackKind::Text);
        text.clips.push(text_clip("a", 5.0));
        text.clips.push(Clip::gap("g", 2.0).unwrap());
        text.clips.push(text_clip("b", 3.0));
        project.tracks.push(text);
        project
    }

    #[test]
    fn derives_start_times_from_preceding_durations() {
        let project = project();
        let placed = flatten(&project);
        assert_eq!(placed.len(), 2); // gap not emitted
        assert_eq!(placed[0].clip.id, "a");
        assert_eq!(placed[0].start, 0.0);
        assert_eq!(placed[1].clip.id, "b");
        assert_eq!(placed[1].start, 7.0); // gap advanced the clock
    }

    #[test]
    fn tracks_have_independent_clocks() {
        let mut project = project();
        let mut video = Track::new("v1", "Video 1", TrackKind::Video);
        video
            .clips
            .push(Clip::new("v", ClipKind::Video, Some("a.mp4".into()), 4.0).unwrap());
        project.tracks.insert(0, video);

        let placed = flatten(&project);
        assert_eq!(placed[0].clip.id, "v");
        assert_eq!(placed[0].start, 0.0);
        assert_eq!(placed[0].track_index, 0);
        // Text track restarts at 0.0, unaffected by the video track.
        assert_eq!(placed[1].clip.id, "a");
        assert_eq!(placed[1].start, 0.0);
        assert_eq!(placed[1].track_index, 1);
    }

    #[test]
    fn invisible_tracks_are_excluded_and_reappear() {
        let mut project = project();
        project.tracks[0].visible = false;
        assert!(flatten(&project).is_empty());

        // Toggling visibility back restores the plan without data change.
        project.tracks[0].visible = true;
        let placed = flatten(&project);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[1].start, 7.0);
    }

    #[test]
    fn flatten_is_idempotent() {
        let project = project();
        let first: Vec<(String, f64)> = flatten(&project)
            .iter()
            .map(|p| (p.clip.id.clone(), p.start))
            .collect();
        let second: Vec<(String, f64)> = flatten(&project)
            .iter()
            .map(|p| (p.clip.id.clone(), p.start))
            .collect();
        assert_eq!(first, second);
    }
}
