// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image review gate: pure predicates over a facility's image set.
//!
//! A facility advances through approval only while every one of its images
//! has been individually approved. An empty image set does not pass; it
//! means review has not happened at all.

use dogrun_core::types::{FacilityImage, ImageApproval};

/// True when the facility has at least one image and all of them are
/// approved.
pub fn is_fully_approved(images: &[FacilityImage]) -> bool {
    !images.is_empty()
        && images
            .iter()
            .all(|image| image.approval == ImageApproval::Approved)
}

/// How many images are still pending or rejected.
pub fn unresolved_count(images: &[FacilityImage]) -> usize {
    images
        .iter()
        .filter(|image| image.approval != ImageApproval::Approved)
        .count()
}

/// Trim a rejection note down to its content; whitespace-only input is no
/// note at all.
pub fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: &str, approval: ImageApproval) -> FacilityImage {
        FacilityImage {
            id: id.to_string(),
            facility_id: "f-1".to_string(),
            image_type: "entrance".to_string(),
            approval,
            admin_note: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn empty_image_set_does_not_pass() {
        assert!(!is_fully_approved(&[]));
    }

    #[test]
    fn one_pending_image_blocks_the_gate() {
        let images = vec![
            image("img-1", ImageApproval::Approved),
            image("img-2", ImageApproval::Pending),
        ];
        assert!(!is_fully_approved(&images));
        assert_eq!(unresolved_count(&images), 1);
    }

    #[test]
    fn rejected_image_blocks_the_gate() {
        let images = vec![
            image("img-1", ImageApproval::Approved),
            image("img-2", ImageApproval::Rejected),
        ];
        assert!(!is_fully_approved(&images));
    }

    #[test]
    fn all_approved_passes() {
        let images = vec![
            image("img-1", ImageApproval::Approved),
            image("img-2", ImageApproval::Approved),
        ];
        assert!(is_fully_approved(&images));
        assert_eq!(unresolved_count(&images), 0);
    }

    #[test]
    fn notes_are_trimmed_and_blanks_dropped() {
        assert_eq!(normalize_note(Some("  too dark  ")).as_deref(), Some("too dark"));
        assert_eq!(normalize_note(Some("   ")), None);
        assert_eq!(normalize_note(None), None);
    }
}
