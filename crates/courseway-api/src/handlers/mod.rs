//! Business handlers, dispatched after the gate stages pass.

mod assignments;
mod courses;
mod submissions;
mod users;

pub use assignments::{
    create_assignment, delete_assignment, get_assignment, list_submissions, update_assignment,
};
pub use courses::{
    create_course, delete_course, get_course, get_roster, get_students, list_course_assignments,
    list_courses, update_course, update_enrollment,
};
pub use submissions::{create_submission, download_submission};
pub use users::{create_user, get_user, login};
