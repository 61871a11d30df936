//! Draft editing and field validation for a single in-progress operative.

use std::collections::BTreeMap;

use shared::{
    domain::{Operative, OperativeId},
    protocol::{CreateOperativeRequest, UpdateOperativeRequest},
};

use crate::breeds::{resolve_breed_options, BreedSource};

/// Draft fields addressable by validation rules and error clearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DraftField {
    Name,
    YearsOfExperience,
    Breed,
    Salary,
}

impl DraftField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::YearsOfExperience => "years_of_experience",
            Self::Breed => "breed",
            Self::Salary => "salary",
        }
    }
}

/// Field-scoped validation failures. An empty map means the draft is
/// submittable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    by_field: BTreeMap<DraftField, String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.by_field.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> + '_ {
        self.by_field
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: DraftField, message: impl Into<String>) {
        self.by_field.insert(field, message.into());
    }

    fn clear(&mut self, field: DraftField) {
        self.by_field.remove(&field);
    }
}

/// Mutable, possibly-invalid candidate operative. Either the whole draft
/// validates and a payload is emitted, or nothing is sent.
#[derive(Debug, Clone, Default)]
pub struct OperativeDraft {
    editing: Option<OperativeId>,
    name: String,
    years_of_experience: i32,
    breed: String,
    salary: f64,
    errors: FieldErrors,
    breed_options: Vec<String>,
}

impl OperativeDraft {
    /// Empty draft for creating a new operative.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-populated from an existing operative. Only the salary edit
    /// is submittable; the remaining fields are kept for display and
    /// comparison.
    pub fn for_edit(operative: &Operative) -> Self {
        Self {
            editing: Some(operative.id),
            name: operative.name.clone(),
            years_of_experience: operative.years_of_experience,
            breed: operative.breed.clone(),
            salary: operative.salary,
            errors: FieldErrors::default(),
            breed_options: Vec::new(),
        }
    }

    pub fn editing(&self) -> Option<OperativeId> {
        self.editing
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn years_of_experience(&self) -> i32 {
        self.years_of_experience
    }

    pub fn breed(&self) -> &str {
        &self.breed
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn breed_options(&self) -> &[String] {
        &self.breed_options
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.errors.clear(DraftField::Name);
    }

    pub fn set_years_of_experience(&mut self, years: i32) {
        self.years_of_experience = years;
        self.errors.clear(DraftField::YearsOfExperience);
    }

    pub fn set_breed(&mut self, breed: impl Into<String>) {
        self.breed = breed.into();
        self.errors.clear(DraftField::Breed);
    }

    pub fn set_salary(&mut self, salary: f64) {
        self.salary = salary;
        self.errors.clear(DraftField::Salary);
    }

    /// One-shot fetch of the offerable breed set for this activation. A
    /// failed fetch falls back to the fixed list and is never a draft error.
    pub async fn load_breed_options(&mut self, source: &dyn BreedSource) {
        self.breed_options = resolve_breed_options(source).await;
    }

    /// Runs every rule and reports all violations at once; the rules are
    /// independent and never short-circuit each other. The error map stays
    /// on the draft for correction.
    pub fn validate(&mut self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.name.trim().is_empty() {
            errors.insert(DraftField::Name, "Name is required");
        }

        if self.years_of_experience < 0 {
            errors.insert(
                DraftField::YearsOfExperience,
                "Years of experience must be non-negative",
            );
        }

        if self.breed.is_empty() {
            errors.insert(DraftField::Breed, "Breed is required");
        } else if !self.breed_options.is_empty()
            && !self.breed_options.iter().any(|option| option == &self.breed)
        {
            errors.insert(DraftField::Breed, "Breed must be one of the offered breeds");
        }

        if self.salary < 0.0 {
            errors.insert(DraftField::Salary, "Salary must be non-negative");
        }

        self.errors = errors.clone();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates and, only on success, emits the creation payload.
    pub fn submit_create(&mut self) -> Result<CreateOperativeRequest, FieldErrors> {
        self.validate()?;
        Ok(CreateOperativeRequest {
            name: self.name.clone(),
            years_of_experience: self.years_of_experience,
            breed: self.breed.clone(),
            salary: self.salary,
        })
    }

    /// Validates and, only on success, emits the salary-only update payload.
    /// Edits to any other field never reach the update operation.
    pub fn submit_update(&mut self) -> Result<UpdateOperativeRequest, FieldErrors> {
        self.validate()?;
        Ok(UpdateOperativeRequest {
            salary: self.salary,
        })
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
