use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("duplicate operationId `{operation_id}` on {second}, first declared on {first}")]
    DuplicateOperationId {
        operation_id: String,
        first: String,
        second: String,
    },
}
