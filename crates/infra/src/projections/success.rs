use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub fn project_success(success: bool) -> SuccessResponse {
    SuccessResponse { success }
}
