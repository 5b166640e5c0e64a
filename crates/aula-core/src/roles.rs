//! Coarse role classification over the freeform LTI `roles` string.
//!
//! Matching is by case-insensitive substring, not by role token: a roles
//! string such as `"urn:lti:role:ims/lis/Learner"` matches, and so does any
//! unrelated word that happens to contain one of the markers. Both predicates
//! can hold for the same string; callers decide precedence.

const STUDENT_MARKERS: &[&str] = &["learner", "student"];

const TEACHER_OR_ADMIN_MARKERS: &[&str] = &["administrator", "instructor", "teacher", "admin"];

fn contains_any(roles: Option<&str>, markers: &[&str]) -> bool {
    let roles = match roles {
        Some(r) if !r.is_empty() => r.to_lowercase(),
        _ => return false,
    };
    markers.iter().any(|m| roles.contains(m))
}

/// True when the roles string mentions `learner` or `student`.
pub fn is_student_role(roles: Option<&str>) -> bool {
    contains_any(roles, STUDENT_MARKERS)
}

/// True when the roles string mentions `administrator`, `instructor`,
/// `teacher` or `admin`.
pub fn is_teacher_or_admin_role(roles: Option<&str>) -> bool {
    contains_any(roles, TEACHER_OR_ADMIN_MARKERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_matches_learner_and_student_any_case() {
        for roles in ["Learner", "Student", "learner", "STUDENT", "Learner,Member"] {
            assert!(is_student_role(Some(roles)), "{roles}");
        }
    }

    #[test]
    fn student_rejects_staff_roles() {
        assert!(!is_student_role(Some("Teacher")));
        assert!(!is_student_role(Some("Instructor")));
    }

    #[test]
    fn student_false_for_missing_or_empty() {
        assert!(!is_student_role(None));
        assert!(!is_student_role(Some("")));
    }

    #[test]
    fn teacher_or_admin_matches_all_markers_any_case() {
        for roles in [
            "Administrator",
            "Instructor",
            "Teacher",
            "Admin",
            "administrator",
            "INSTRUCTOR",
            "Instructor,Member",
        ] {
            assert!(is_teacher_or_admin_role(Some(roles)), "{roles}");
        }
    }

    #[test]
    fn teacher_or_admin_rejects_students() {
        assert!(!is_teacher_or_admin_role(Some("Student")));
        assert!(!is_teacher_or_admin_role(Some("Learner")));
    }

    #[test]
    fn teacher_or_admin_false_for_missing_or_empty() {
        assert!(!is_teacher_or_admin_role(None));
        assert!(!is_teacher_or_admin_role(Some("")));
    }

    #[test]
    fn urn_roles_match_by_substring() {
        let roles = "urn:lti:role:ims/lis/Instructor urn:lti:sysrole:ims/lis/Administrator";
        assert!(is_teacher_or_admin_role(Some(roles)));
        assert!(!is_student_role(Some(roles)));
    }

    #[test]
    fn substring_match_is_not_token_match() {
        // "Badminton" contains "admin"; kept for compatibility.
        assert!(is_teacher_or_admin_role(Some("BadmintonClub")));
    }

    #[test]
    fn predicates_are_not_exclusive() {
        let roles = "Learner,Instructor";
        assert!(is_student_role(Some(roles)));
        assert!(is_teacher_or_admin_role(Some(roles)));
    }
}
