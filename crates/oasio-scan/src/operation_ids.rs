use std::collections::HashMap;

use oasio_core::config::DuplicateOperationIdBehavior;

use crate::error::ScanError;

/// Tracks which resource method first claimed each `operationId`.
#[derive(Debug, Default)]
pub struct OperationIdRegistry {
    behavior: DuplicateOperationIdBehavior,
    owners: HashMap<String, String>,
}

impl OperationIdRegistry {
    pub fn new(behavior: DuplicateOperationIdBehavior) -> Self {
        Self {
            behavior,
            owners: HashMap::new(),
        }
    }

    /// Record `operation_id` for `class#method`. A repeated id is a warning
    /// or an error depending on the configured behavior; the first owner is
    /// kept either way.
    pub fn register(
        &mut self,
        operation_id: &str,
        class: &str,
        method: &str,
    ) -> Result<(), ScanError> {
        let owner = format!("{class}#{method}");
        let Some(first) = self.owners.get(operation_id) else {
            self.owners.insert(operation_id.to_string(), owner);
            return Ok(());
        };
        match self.behavior {
            DuplicateOperationIdBehavior::Warn => {
                log::warn!("duplicate operationId `{operation_id}` on {owner}, first on {first}");
                Ok(())
            }
            DuplicateOperationIdBehavior::Fail => Err(ScanError::DuplicateOperationId {
                operation_id: operation_id.to_string(),
                first: first.clone(),
                second: owner,
            }),
        }
    }

    pub fn contains(&self, operation_id: &str) -> bool {
        self.owners.contains_key(operation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_keeps_first_owner() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut registry = OperationIdRegistry::new(DuplicateOperationIdBehavior::Warn);
        registry.register("listPets", "api.Pets", "list").unwrap();
        registry.register("listPets", "api.Owners", "pets").unwrap();
        assert!(registry.contains("listPets"));
        assert_eq!(registry.owners["listPets"], "api.Pets#list");
    }

    #[test]
    fn test_fail_reports_both_owners() {
        let mut registry = OperationIdRegistry::new(DuplicateOperationIdBehavior::Fail);
        registry.register("listPets", "api.Pets", "list").unwrap();
        let err = registry
            .register("listPets", "api.Owners", "pets")
            .unwrap_err();
        let ScanError::DuplicateOperationId { first, second, .. } = err;
        assert_eq!(first, "api.Pets#list");
        assert_eq!(second, "api.Owners#pets");
    }
}
