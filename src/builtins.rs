//! The built-in name table seeded by the [`crate::module_driver::ModuleDriver`]
//! (§4.2): at minimum, `print : Func(arg_count=1, ret_count=0)`.

use std::collections::HashMap;

use crate::ir::{FuncRegistry, FuncSignature};
use crate::value::Value;

/// Seed a fresh name table and registry with the built-ins every module sees.
/// `print` is assumed to be a primitive the CLAC runtime provides directly;
/// it is never assembled as a word definition.
pub fn seed(registry: &mut FuncRegistry) -> HashMap<String, Value> {
    let mut names = HashMap::new();
    let print_id = registry.reserve(FuncSignature {
        name: "print".to_string(),
        arg_slots: 1,
        param_count: 1,
        ret_count: 0,
    });
    names.insert("print".to_string(), Value::Func(print_id));
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_is_seeded_with_arity_one_zero() {
        let mut registry = FuncRegistry::new();
        let names = seed(&mut registry);
        let Value::Func(id) = names["print"] else {
            panic!("print should be a Func value");
        };
        assert_eq!(registry.param_count(id), 1);
        assert_eq!(registry.ret_count(id), 0);
    }
}
