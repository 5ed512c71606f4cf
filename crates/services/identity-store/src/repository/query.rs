//! Translation of domain filters into SeaORM conditions.

use sea_orm::{ColumnTrait, Condition, Value};

use super::entities::user::Column;
use domain::{FieldValue, Filter, UserField};

pub(crate) fn column(field: UserField) -> Column {
    match field {
        UserField::Id => Column::Id,
        UserField::Email => Column::Email,
        UserField::VerificationToken => Column::VerificationToken,
        UserField::Type => Column::UserType,
        UserField::Verified => Column::Verified,
        UserField::Blocked => Column::Blocked,
    }
}

pub(crate) fn sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => text.clone().into(),
        FieldValue::Bool(flag) => (*flag).into(),
        FieldValue::Id(id) => (*id).into(),
    }
}

pub(crate) fn condition(filter: &Filter) -> Condition {
    match filter {
        Filter::Empty => Condition::all(),
        Filter::Eq(field, value) => Condition::all().add(column(*field).eq(sql_value(value))),
        Filter::In(field, values) => {
            Condition::all().add(column(*field).is_in(values.iter().map(sql_value)))
        }
    }
}
