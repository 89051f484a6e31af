use cti_core::{stmt::Value, Error};

/// Hashable form of a primary key value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Key {
    Bool(bool),
    I64(i64),
    String(String),
}

impl TryFrom<&Value> for Key {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Bool(v) => Ok(Key::Bool(*v)),
            Value::I64(v) => Ok(Key::I64(*v)),
            Value::String(v) => Ok(Key::String(v.clone())),
            Value::Null => Err(cti_core::err!("primary key is null")),
            Value::F64(_) => Err(Error::type_conversion(value.clone(), "key")),
        }
    }
}
