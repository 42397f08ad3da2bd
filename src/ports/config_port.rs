//! Configuration access port trait.

use crate::domain::num::Num;

/// Typed lookups fall back to `default` when the key is absent or does not
/// parse. Use `config_validation` first to reject unparseable values.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_usize(&self, section: &str, key: &str, default: usize) -> usize;
    fn get_num(&self, section: &str, key: &str, default: Num) -> Num;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
