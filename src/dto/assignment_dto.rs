use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentPayload {
    pub parent_id: Uuid,
    pub student_id: Uuid,
}
