use serde::{Deserialize, Serialize};

/// Payload for creating a roster entry. Carries no identifier; the remote
/// service assigns one and returns the stored entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOperativeRequest {
    pub name: String,
    pub years_of_experience: i32,
    pub breed: String,
    pub salary: f64,
}

/// Salary is the only field the update operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateOperativeRequest {
    pub salary: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_carries_salary_only() {
        let encoded =
            serde_json::to_value(UpdateOperativeRequest { salary: 60000.0 }).expect("encode");
        let object = encoded.as_object().expect("object");
        assert_eq!(object.len(), 1);
        assert_eq!(object.get("salary").and_then(|v| v.as_f64()), Some(60000.0));
    }

    #[test]
    fn create_payload_uses_contract_field_names() {
        let encoded = serde_json::to_value(CreateOperativeRequest {
            name: "Whiskers".to_string(),
            years_of_experience: 3,
            breed: "Bengal".to_string(),
            salary: 50000.0,
        })
        .expect("encode");
        let object = encoded.as_object().expect("object");
        assert!(object.contains_key("years_of_experience"));
        assert!(!object.contains_key("id"));
    }
}
