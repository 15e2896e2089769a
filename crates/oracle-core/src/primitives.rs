//! Built-in types: primitives and the generic containers.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint12,
    Uint16,
    Uint20,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bool,
    String,
    Uuid,
    Json,
    Bytes,
    Any,
    Timestamp,
    Timespan,
    TimeRange,
}

impl Primitive {
    pub const ALL: [Primitive; 21] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint8,
        Self::Uint12,
        Self::Uint16,
        Self::Uint20,
        Self::Uint32,
        Self::Uint64,
        Self::Float32,
        Self::Float64,
        Self::Bool,
        Self::String,
        Self::Uuid,
        Self::Json,
        Self::Bytes,
        Self::Any,
        Self::Timestamp,
        Self::Timespan,
        Self::TimeRange,
    ];

    /// Canonical tag, as written in schemas.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint12 => "uint12",
            Self::Uint16 => "uint16",
            Self::Uint20 => "uint20",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::Json => "json",
            Self::Bytes => "bytes",
            Self::Any => "any",
            Self::Timestamp => "timestamp",
            Self::Timespan => "timespan",
            Self::TimeRange => "time_range",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Primitives represented as strings on the wire.
    pub fn is_string(self) -> bool {
        matches!(self, Self::String | Self::Uuid)
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint8
                | Self::Uint12
                | Self::Uint16
                | Self::Uint20
                | Self::Uint32
                | Self::Uint64
        )
    }

    pub fn is_number(self) -> bool {
        self.is_integer() || matches!(self, Self::Float32 | Self::Float64)
    }
}

pub fn is_primitive(name: &str) -> bool {
    Primitive::from_name(name).is_some()
}

pub fn is_string_primitive(name: &str) -> bool {
    Primitive::from_name(name).is_some_and(Primitive::is_string)
}

pub fn is_number_primitive(name: &str) -> bool {
    Primitive::from_name(name).is_some_and(Primitive::is_number)
}

/// Generic containers every schema can use without importing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BuiltinGeneric {
    Array,
    Map,
}

impl BuiltinGeneric {
    pub const ALL: [BuiltinGeneric; 2] = [Self::Array, Self::Map];

    pub fn name(self) -> &'static str {
        match self {
            Self::Array => "Array",
            Self::Map => "Map",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Self::Array => 1,
            Self::Map => 2,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.name() == name)
    }
}
