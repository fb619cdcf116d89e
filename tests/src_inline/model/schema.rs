use super::*;

fn six_field_record() -> FeatureRecord {
    FeatureRecord::new()
        .with("EmpLastSalaryHikePercent", 10)
        .with("EmpEnvironmentSatisfaction", 3)
        .with("EmpJobSatisfaction", 3)
        .with("YearsSinceLastPromotion", 2)
        .with("EmpWorkLifeBalance", 3)
        .with("EmpJobInvolvement", 3)
}

fn mixed_schema() -> FeatureSchema {
    FeatureSchema {
        name: "mixed".to_string(),
        version: "2".to_string(),
        features: vec![
            FeatureSpec {
                name: "Age".to_string(),
                kind: FeatureKind::Integer {
                    min: Some(18),
                    max: None,
                },
                default: None,
            },
            FeatureSpec {
                name: "EmpDepartment".to_string(),
                kind: FeatureKind::Categorical {
                    levels: vec![
                        "Sales".to_string(),
                        "Development".to_string(),
                        "Finance".to_string(),
                    ],
                },
                default: None,
            },
            FeatureSpec {
                name: "EmpHourlyRate".to_string(),
                kind: FeatureKind::Float {
                    min: Some(0.0),
                    max: Some(200.0),
                },
                default: None,
            },
        ],
    }
}

#[test]
fn test_builtin_schema_matches_form() {
    let schema = employee_performance_v1();
    assert_eq!(schema.id(), "employee_performance@1");
    assert_eq!(schema.len(), 6);
    assert_eq!(schema.features[0].name, "EmpLastSalaryHikePercent");
    assert!(schema.check().is_ok());
    assert_eq!(schema.defaults(), six_field_record());
}

#[test]
fn test_validate_accepts_exact_record() {
    let schema = employee_performance_v1();
    assert!(schema.validate(&six_field_record()).is_ok());
}

#[test]
fn test_missing_field_is_named() {
    let schema = employee_performance_v1();
    let mut record = FeatureRecord::new();
    for (name, value) in six_field_record().iter() {
        if name != "EmpJobInvolvement" {
            record.insert(name, value.clone());
        }
    }
    let err = schema.validate(&record).unwrap_err();
    assert_eq!(err.missing, vec!["EmpJobInvolvement".to_string()]);
    assert!(err.unexpected.is_empty());
    assert!(err.to_string().contains("EmpJobInvolvement"));
}

#[test]
fn test_unexpected_field_is_named() {
    let schema = employee_performance_v1();
    let record = six_field_record().with("Attrition", "No");
    let err = schema.validate(&record).unwrap_err();
    assert!(err.missing.is_empty());
    assert_eq!(err.unexpected, vec!["Attrition".to_string()]);
}

#[test]
fn test_out_of_range_and_wrong_kind() {
    let schema = employee_performance_v1();
    let record = six_field_record()
        .with("EmpJobSatisfaction", 5)
        .with("EmpWorkLifeBalance", "high");
    let err = schema.validate(&record).unwrap_err();
    let names: Vec<&str> = err.invalid.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["EmpJobSatisfaction", "EmpWorkLifeBalance"]);
    assert!(err.invalid[0].reason.contains("outside"));
    assert!(err.invalid[1].reason.contains("expected integer"));
}

#[test]
fn test_encode_follows_schema_order() {
    let schema = mixed_schema();
    let record = FeatureRecord::new()
        .with("EmpHourlyRate", 55)
        .with("EmpDepartment", "Finance")
        .with("Age", 30);
    assert_eq!(schema.encode(&record).unwrap(), vec![30.0, 2.0, 55.0]);
}

#[test]
fn test_unknown_level_rejected() {
    let schema = mixed_schema();
    let record = FeatureRecord::new()
        .with("EmpHourlyRate", 55.5)
        .with("EmpDepartment", "Marketing")
        .with("Age", 30);
    let err = schema.encode(&record).unwrap_err();
    assert_eq!(err.invalid.len(), 1);
    assert_eq!(err.invalid[0].name, "EmpDepartment");
}

#[test]
fn test_float_field_rejects_integer_kind_mismatch() {
    let schema = mixed_schema();
    let record = FeatureRecord::new()
        .with("EmpHourlyRate", 55.5)
        .with("EmpDepartment", "Sales")
        .with("Age", 30.5);
    let err = schema.validate(&record).unwrap_err();
    assert_eq!(err.invalid[0].name, "Age");
}

#[test]
fn test_schema_check_rejects_duplicates_and_bad_bounds() {
    let mut schema = mixed_schema();
    schema.features.push(schema.features[0].clone());
    assert!(schema.check().unwrap_err().contains("declared twice"));

    let mut schema = mixed_schema();
    schema.features[2].kind = FeatureKind::Float {
        min: Some(10.0),
        max: Some(1.0),
    };
    assert!(schema.check().is_err());

    let mut schema = mixed_schema();
    schema.features[1].kind = FeatureKind::Categorical { levels: Vec::new() };
    assert!(schema.check().is_err());
}

#[test]
fn test_schema_json_shape() {
    let json = r#"{
        "name": "mixed",
        "version": "2",
        "features": [
            {"name": "Age", "type": "integer", "min": 18},
            {"name": "EmpDepartment", "type": "categorical", "levels": ["Sales", "Development", "Finance"]},
            {"name": "EmpHourlyRate", "type": "float", "min": 0, "max": 200}
        ]
    }"#;
    let schema: FeatureSchema = serde_json::from_str(json).unwrap();
    assert_eq!(schema, mixed_schema());
}
