//! Integration tests for conditional attribute validation

use trattoria_foundation::ErrorKind;
use trattoria_storage::{ConditionalValidator, Discriminated};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Course {
    Starter,
    Main,
    Dessert,
}

#[derive(Default)]
struct Plate {
    course: Option<Course>,
    portion_grams: Option<u32>,
    side: Option<String>,
    sweetness: Option<u8>,
}

impl Discriminated<Option<Course>> for Plate {
    fn discriminant(&self) -> Option<Course> {
        self.course
    }

    fn is_populated(&self, attribute: &str) -> bool {
        match attribute {
            "portion_grams" => self.portion_grams.is_some(),
            "side" => self.side.is_some(),
            "sweetness" => self.sweetness.is_some(),
            _ => false,
        }
    }
}

fn rules() -> ConditionalValidator<Option<Course>> {
    ConditionalValidator::new("course", &["portion_grams", "side", "sweetness"])
        .rule(Some(Course::Starter), &["portion_grams"], &[])
        .rule(Some(Course::Main), &["portion_grams"], &["side"])
        .rule(Some(Course::Dessert), &["sweetness"], &[])
        .rule(None, &[], &[])
}

fn failing_field(plate: &Plate) -> String {
    match rules().validate(plate).unwrap_err().kind {
        ErrorKind::Validation { field, .. } => field,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn legal_attributes_follow_declaration_order() {
    assert_eq!(rules().legal(&Some(Course::Main)), vec!["portion_grams", "side"]);
    assert!(rules().legal(&None).is_empty());
}

#[test]
fn optional_attribute_may_be_absent_or_present() {
    let mut plate = Plate {
        course: Some(Course::Main),
        portion_grams: Some(300),
        ..Plate::default()
    };
    assert!(rules().validate(&plate).is_ok());

    plate.side = Some("Fries".to_string());
    assert!(rules().validate(&plate).is_ok());
}

#[test]
fn foreign_attribute_rejected() {
    let plate = Plate {
        course: Some(Course::Starter),
        portion_grams: Some(120),
        sweetness: Some(3),
        ..Plate::default()
    };
    assert_eq!(failing_field(&plate), "sweetness");
}

#[test]
fn missing_mandatory_attribute_rejected() {
    let plate = Plate {
        course: Some(Course::Dessert),
        ..Plate::default()
    };
    assert_eq!(failing_field(&plate), "sweetness");
}

#[test]
fn untagged_record_must_be_bare() {
    assert!(rules().validate(&Plate::default()).is_ok());

    let plate = Plate {
        side: Some("Salad".to_string()),
        ..Plate::default()
    };
    assert_eq!(failing_field(&plate), "side");
}

#[test]
fn tag_without_rule_names_discriminant() {
    let partial = ConditionalValidator::new("course", &["side"]).rule(None, &[], &[]);
    let plate = Plate {
        course: Some(Course::Main),
        ..Plate::default()
    };

    let err = partial.validate(&plate).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Validation { ref field, .. } if field == "course"));
}
