//! Merging of overlapping detections from independent strategies.
//!
//! Two resolution rules, applied against already-accepted spans in sorted
//! order (start ascending, end descending, so enclosing spans are seen
//! first):
//!
//! - containment: the contained span survives only by higher confidence
//! - partial overlap: the longer span wins, regardless of confidence
//!
//! A span is compared against accepted spans until the first conflict;
//! replacement keeps the list length, so one new span never displaces two
//! accepted ones.

use docprep_core::Detection;

/// Merge overlapping detections into a non-conflicting set.
#[must_use = "merged detections are returned, the input is consumed"]
pub fn merge_detections(detections: Vec<Detection>) -> Vec<Detection> {
    if detections.is_empty() {
        return Vec::new();
    }

    let mut sorted = detections;
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut merged: Vec<Detection> = Vec::new();

    for detection in sorted {
        let mut conflict = false;

        for accepted in &mut merged {
            if detection.start >= accepted.start && detection.end <= accepted.end {
                // Contained: keep the more confident reading
                conflict = true;
                if detection.confidence > accepted.confidence {
                    *accepted = detection.clone();
                }
                break;
            } else if detection.start < accepted.end && detection.end > accepted.start {
                // Partial overlap: the longer span wins
                conflict = true;
                if detection.len() > accepted.len() {
                    *accepted = detection.clone();
                }
                break;
            }
        }

        if !conflict {
            merged.push(detection);
        }
    }

    merged
}
