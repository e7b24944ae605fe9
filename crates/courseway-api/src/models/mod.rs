//! Request and response DTOs for the courseway API.

mod requests;
mod responses;

pub use requests::{
    CourseListQuery, CreateAssignmentRequest, CreateCourseRequest, CreateUserRequest,
    EnrollmentUpdateRequest, LoginRequest, PageQuery, UpdateAssignmentRequest,
    UpdateCourseRequest,
};
pub use responses::{
    AssignmentListResponse, AssignmentResponse, CourseListResponse, CourseResponse, Created,
    SubmissionCreatedResponse, SubmissionLinks, SubmissionListResponse, SubmissionResponse,
    TokenResponse, UserResponse,
};
