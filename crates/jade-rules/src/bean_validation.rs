//! Bean Validation constraint placement rules.
//!
//! Validates the `jakarta.validation.constraints` vocabulary: constraints are
//! rejected on static elements, and each constraint family only applies to a
//! fixed set of Java types (boxed primitives are unboxed before the check).

use jade_syntax::{
    is_primitive, simple_name, strip_generic_args, unbox, Annotation, CompilationUnit, Modifiers,
    Resolver,
};
use jade_types::Diagnostic;

use crate::Collector;

pub const SOURCE: &str = "jakarta-bean-validation";

pub const CONSTRAINT_ON_STATIC: &str = "BV_CONSTRAINT_ON_STATIC";
pub const INVALID_CONSTRAINT_TYPE: &str = "BV_INVALID_CONSTRAINT_TYPE";

const CONSTRAINT_PKG: &str = "jakarta.validation.constraints.";

const CONSTRAINTS: &[&str] = &[
    "AssertFalse",
    "AssertTrue",
    "DecimalMax",
    "DecimalMin",
    "Digits",
    "Email",
    "Future",
    "FutureOrPresent",
    "Max",
    "Min",
    "Negative",
    "NegativeOrZero",
    "NotBlank",
    "NotEmpty",
    "Past",
    "PastOrPresent",
    "Pattern",
    "Positive",
    "PositiveOrZero",
    "Size",
];

pub struct BeanValidationCollector;

impl Collector for BeanValidationCollector {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>) {
        for ty in unit.all_types() {
            for field in &ty.fields {
                check_element(
                    unit,
                    resolver,
                    &field.annotations,
                    Some(&field.modifiers),
                    &field.ty,
                    sink,
                );
            }
            for method in &ty.methods {
                check_element(
                    unit,
                    resolver,
                    &method.annotations,
                    Some(&method.modifiers),
                    &method.return_type,
                    sink,
                );
                for param in &method.params {
                    check_element(unit, resolver, &param.annotations, None, &param.ty, sink);
                }
            }
            for ctor in &ty.constructors {
                for param in &ctor.params {
                    check_element(unit, resolver, &param.annotations, None, &param.ty, sink);
                }
            }
        }
    }
}

fn check_element(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    annotations: &[Annotation],
    modifiers: Option<&Modifiers>,
    declared_type: &str,
    sink: &mut Vec<Diagnostic>,
) {
    for ann in annotations {
        let Some(constraint) = matched_constraint(unit, resolver, ann) else {
            continue;
        };
        let fqn = format!("{CONSTRAINT_PKG}{constraint}");

        // The static check wins; a static element gets exactly one diagnostic
        // even when its type is also out of range.
        if modifiers.is_some_and(Modifiers::is_static) {
            sink.push(
                Diagnostic::error(
                    CONSTRAINT_ON_STATIC,
                    "Constraint annotations are not allowed on static fields, methods or parameters.",
                    Some(ann.span),
                )
                .with_data(fqn),
            );
            continue;
        }

        if !constraint_type_allowed(unit, resolver, constraint, declared_type) {
            sink.push(
                Diagnostic::error(
                    INVALID_CONSTRAINT_TYPE,
                    format!(
                        "The @{} annotation can only be used on {} elements.",
                        constraint,
                        allowed_types_description(constraint)
                    ),
                    Some(ann.span),
                )
                .with_data(fqn),
            );
        }
    }
}

fn matched_constraint(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    ann: &Annotation,
) -> Option<&'static str> {
    let constraint = CONSTRAINTS
        .iter()
        .copied()
        .find(|c| *c == ann.simple_name)?;
    let fqn = format!("{CONSTRAINT_PKG}{constraint}");
    resolver
        .annotation_matches(unit, ann, &fqn)
        .then_some(constraint)
}

fn constraint_type_allowed(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    constraint: &str,
    declared_type: &str,
) -> bool {
    let stripped = strip_generic_args(declared_type);
    let base = stripped.trim();
    let is_array = base.ends_with("[]");
    let element = base.trim_end_matches("[]").trim();
    let simple = unbox(simple_name(element).unwrap_or(element));

    let is_char_sequence = !is_array
        && (simple == "String" || resolver.type_reference_is(unit, declared_type, "java.lang.CharSequence"));
    let is_whole_number = !is_array
        && matches!(simple, "BigDecimal" | "BigInteger" | "byte" | "short" | "int" | "long");

    match constraint {
        "AssertFalse" | "AssertTrue" => !is_array && simple == "boolean",
        "DecimalMax" | "DecimalMin" | "Digits" => is_whole_number || is_char_sequence,
        "Email" | "NotBlank" | "Pattern" => is_char_sequence,
        "Future" | "FutureOrPresent" | "Past" | "PastOrPresent" => {
            !is_array && is_temporal(simple)
        }
        "Max" | "Min" => is_whole_number,
        "Negative" | "NegativeOrZero" | "Positive" | "PositiveOrZero" => {
            is_whole_number || (!is_array && matches!(simple, "float" | "double"))
        }
        "NotEmpty" | "Size" => {
            is_array
                || is_char_sequence
                || (!is_primitive(simple)
                    && (resolver.type_reference_is(unit, declared_type, "java.util.Collection")
                        || resolver.type_reference_is(unit, declared_type, "java.util.Map")))
        }
        _ => true,
    }
}

fn is_temporal(simple: &str) -> bool {
    matches!(
        simple,
        "Date"
            | "Calendar"
            | "Instant"
            | "LocalDate"
            | "LocalDateTime"
            | "LocalTime"
            | "MonthDay"
            | "OffsetDateTime"
            | "OffsetTime"
            | "Year"
            | "YearMonth"
            | "ZonedDateTime"
            | "HijrahDate"
            | "JapaneseDate"
            | "MinguoDate"
            | "ThaiBuddhistDate"
    )
}

fn allowed_types_description(constraint: &str) -> &'static str {
    match constraint {
        "AssertFalse" | "AssertTrue" => "boolean or Boolean",
        "DecimalMax" | "DecimalMin" | "Digits" => {
            "BigDecimal, BigInteger, CharSequence, byte, short, int or long"
        }
        "Email" | "NotBlank" | "Pattern" => "String or CharSequence",
        "Future" | "FutureOrPresent" | "Past" | "PastOrPresent" => "date or time",
        "Max" | "Min" => "BigDecimal, BigInteger, byte, short, int or long",
        "Negative" | "NegativeOrZero" | "Positive" | "PositiveOrZero" => {
            "BigDecimal, BigInteger, byte, short, int, long, float or double"
        }
        "NotEmpty" | "Size" => "CharSequence, Collection, Map or array",
        _ => "supported",
    }
}
