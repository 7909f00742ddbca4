//! Contract class ABI model.
//!
//! Only what the resolver needs is modeled: function names, their inputs and
//! mutability, including functions nested inside Cairo 1 `interface` items.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};

/// One parameter of an ABI function.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A function declared by the ABI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AbiFunction {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default, alias = "stateMutability")]
    pub state_mutability: Option<String>,
}

impl AbiFunction {
    pub fn is_view(&self) -> bool {
        self.state_mutability.as_deref() == Some("view")
    }
}

/// An ABI item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbiEntry {
    Function(AbiFunction),
    Interface {
        name: String,
        #[serde(default)]
        items: Vec<AbiEntry>,
    },
    #[serde(other)]
    Other,
}

/// A contract class as far as its ABI is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractClass {
    pub abi: Vec<AbiEntry>,
}

impl ContractClass {
    pub fn new(abi: Vec<AbiEntry>) -> Self {
        Self { abi }
    }

    /// Parse a class as returned by `starknet_getClassAt`.
    ///
    /// Sierra classes carry the ABI as a JSON string; legacy classes carry
    /// it as an array. A class without ABI yields an empty one.
    pub fn from_json(class: &Value) -> Result<Self> {
        let abi = match class.get("abi") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(encoded)) if encoded.trim().is_empty() => Vec::new(),
            Some(Value::String(encoded)) => serde_json::from_str(encoded)?,
            Some(array @ Value::Array(_)) => serde_json::from_value(array.clone())?,
            Some(other) => {
                return Err(AppError::Parse(format!("unexpected ABI encoding: {other}")));
            }
        };
        Ok(Self { abi })
    }

    /// All declared functions, flattened across interfaces.
    pub fn functions(&self) -> Vec<&AbiFunction> {
        fn collect<'a>(entries: &'a [AbiEntry], out: &mut Vec<&'a AbiFunction>) {
            for entry in entries {
                match entry {
                    AbiEntry::Function(function) => out.push(function),
                    AbiEntry::Interface { items, .. } => collect(items, out),
                    AbiEntry::Other => {}
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.abi, &mut out);
        out
    }

    pub fn find_function(&self, name: &str) -> Option<&AbiFunction> {
        self.functions().into_iter().find(|f| f.name == name)
    }
}
