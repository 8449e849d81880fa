//! Shared test fixtures: a `Person` entity, its model and dataset builders.

use crate::{
    model::{EntityModel, FieldKind, FieldModel, RelationModel},
    order::OrderSpec,
    source::MemorySource,
    traits::{EntityKind, EntityValue},
    value::Value,
};
use std::rc::Rc;

const FIRST_NAMES: [&str; 10] = [
    "Amal", "Bruno", "Chloe", "Dmitri", "Elena", "Farid", "Grace", "Hugo", "Ines", "Jonas",
];

const LAST_NAMES: [&str; 7] = ["Silva", "Martin", "Haddad", "Smith", "Rossi", "Tanaka", "Novak"];

const CITIES: [&str; 5] = ["Dubai", "Recife", "Lyon", "Boston", "Porto"];

const PERSON_FIELDS: &[FieldModel] = &[
    FieldModel::column("id", FieldKind::Int),
    FieldModel::column("name", FieldKind::Text),
    FieldModel::column("nationality", FieldKind::Text),
    FieldModel::column("age", FieldKind::Int),
    FieldModel::relation(
        "city",
        RelationModel {
            table: "cities",
            local_column: "city_id",
            remote_key: "id",
            display_column: "name",
        },
    ),
    FieldModel::computed("label", FieldKind::Text),
];

pub(crate) const PERSON_MODEL: EntityModel = EntityModel {
    path: "test_support::Person",
    table: "people",
    primary_key: "id",
    fields: PERSON_FIELDS,
};

///
/// Person
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Person {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) nationality: String,
    pub(crate) age: Option<i64>,
    pub(crate) city: Option<String>,
}

impl Person {
    pub(crate) fn new(id: i64, name: &str, nationality: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            nationality: nationality.to_string(),
            age: None,
            city: None,
        }
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.nationality)
    }
}

impl EntityKind for Person {
    const MODEL: &'static EntityModel = &PERSON_MODEL;
}

impl EntityValue for Person {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::Int(self.id)),
            "name" => Some(Value::from(self.name.as_str())),
            "nationality" => Some(Value::from(self.nationality.as_str())),
            "age" => Some(Value::from(self.age)),
            "city" => Some(Value::from(self.city.clone())),
            "label" => Some(Value::Text(self.label())),
            _ => None,
        }
    }
}

/// Nationality assigned to `id`: two in five rows are UAE.
pub(crate) const fn nationality_for(id: i64) -> &'static str {
    match id.rem_euclid(5) {
        0 | 1 => "UAE",
        2 => "BRA",
        3 => "FRA",
        _ => "USA",
    }
}

/// `count` people with ids `0..count`, inserted in descending id order so
/// that sources have to sort.
pub(crate) fn people(count: usize) -> Vec<Person> {
    let count = i64::try_from(count).expect("fixture size fits in i64");

    (0..count)
        .rev()
        .map(|id| {
            let index = usize::try_from(id).expect("fixture ids are non-negative");
            let first = FIRST_NAMES[index % FIRST_NAMES.len()];
            let last = LAST_NAMES[index % LAST_NAMES.len()];

            Person {
                id,
                name: format!("{first} {last}"),
                nationality: nationality_for(id).to_string(),
                age: (id % 7 != 0).then_some(18 + id % 50),
                city: (id % 6 != 0).then(|| CITIES[index % CITIES.len()].to_string()),
            }
        })
        .collect()
}

pub(crate) fn people_source(count: usize) -> Rc<MemorySource<Person>> {
    Rc::new(MemorySource::new(people(count)))
}

/// Order parsed against the `Person` model.
pub(crate) fn person_order(raw: &str) -> OrderSpec {
    OrderSpec::parse(raw, &PERSON_MODEL).expect("fixture order should parse")
}
