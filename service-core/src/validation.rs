//! Business-rule validation.
//!
//! A [`RuleSet`] is an ordered list of pure predicates over one entity type.
//! Every rule runs, even after an earlier one fails, so a caller fixing a
//! form sees all of its problems at once.

use crate::outcome::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Forward every violation message, in order.
    pub fn notify(&self, notifier: &mut Notifier) {
        for violation in &self.violations {
            notifier.notify(violation.message.clone());
        }
    }
}

pub trait Validator<E>: Send + Sync {
    fn validate(&self, entity: &E) -> ValidationResult;
}

type Predicate<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

struct Rule<E> {
    field: &'static str,
    message: String,
    holds: Predicate<E>,
}

pub struct RuleSet<E> {
    rules: Vec<Rule<E>>,
}

impl<E> Default for RuleSet<E> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<E: 'static> RuleSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule that holds when `holds` returns true.
    pub fn rule(
        mut self,
        field: &'static str,
        message: impl Into<String>,
        holds: impl Fn(&E) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule {
            field,
            message: message.into(),
            holds: Box::new(holds),
        });
        self
    }

    /// The field must contain something other than whitespace.
    pub fn required(self, field: &'static str, value: fn(&E) -> &str) -> Self {
        self.rule(
            field,
            format!("The {} field is required", field),
            move |e| !value(e).trim().is_empty(),
        )
    }

    /// Character count (not bytes) within `min..=max`.
    pub fn length(self, field: &'static str, value: fn(&E) -> &str, min: usize, max: usize) -> Self {
        self.rule(
            field,
            format!(
                "The {} field must be between {} and {} characters",
                field, min, max
            ),
            move |e| (min..=max).contains(&value(e).chars().count()),
        )
    }
}

impl<E: Send + Sync> Validator<E> for RuleSet<E> {
    fn validate(&self, entity: &E) -> ValidationResult {
        let mut result = ValidationResult::default();
        for rule in &self.rules {
            if !(rule.holds)(entity) {
                result.push(rule.field, rule.message.clone());
            }
        }
        result
    }
}
