//! Request binding: raw parameters → typed, validated values.
//!
//! ## Violation policy
//!
//! Descriptors are checked in declaration order and binding stops at the
//! first violation. The caller gets exactly one `MissingParameter` or
//! `TypeCoercion` error naming the offending parameter, and nothing is
//! partially bound. Keys without a descriptor are ignored.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use nimbus_core::{CommandError, CommandResult};

use crate::param::{BoundValue, ParamDescriptor, RawParams, coerce};

/// Fully bound parameters of one command instance.
///
/// Only declared parameters that were present in the request appear here.
#[derive(Clone, PartialEq, Default)]
pub struct BoundParams {
    values: BTreeMap<&'static str, BoundValue>,
    sensitive: Vec<&'static str>,
}

impl BoundParams {
    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn long(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            BoundValue::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            BoundValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            BoundValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            BoundValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.get(name)? {
            BoundValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[BoundValue]> {
        match self.get(name)? {
            BoundValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl core::fmt::Debug for BoundParams {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.values {
            if self.sensitive.contains(name) {
                map.entry(name, &"<redacted>");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

/// Bind `raw` against `descriptors`.
pub fn bind(raw: &RawParams, descriptors: &[ParamDescriptor]) -> CommandResult<BoundParams> {
    let mut bound = BoundParams::default();

    for descriptor in descriptors {
        match raw.get(descriptor.name) {
            None if descriptor.required => {
                return Err(CommandError::missing(descriptor.name));
            }
            None => {}
            Some(value) => {
                let coerced = coerce(descriptor.name, descriptor.kind, value)?;
                bound.values.insert(descriptor.name, coerced);
                if descriptor.sensitive {
                    bound.sensitive.push(descriptor.name);
                }
            }
        }
    }

    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamKind;
    use proptest::prelude::*;

    const DESCRIPTORS: &[ParamDescriptor] = &[
        ParamDescriptor::optional("clusterid", ParamKind::Long, "cluster"),
        ParamDescriptor::required("password", ParamKind::String, "password").sensitive(),
        ParamDescriptor::required("url", ParamKind::String, "url"),
        ParamDescriptor::required("zoneid", ParamKind::Long, "zone"),
    ];

    fn valid() -> RawParams {
        RawParams::new()
            .with("password", "p")
            .with("url", "http://h")
            .with("zoneid", "5")
    }

    #[test]
    fn binds_required_and_skips_absent_optional() {
        let bound = bind(&valid(), DESCRIPTORS).unwrap();
        assert_eq!(bound.long("zoneid"), Some(5));
        assert_eq!(bound.string("url"), Some("http://h"));
        assert!(!bound.contains("clusterid"));
        assert_eq!(bound.len(), 3);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let bound = bind(&valid().with("hypervisor", "kvm"), DESCRIPTORS).unwrap();
        assert!(bound.get("hypervisor").is_none());
    }

    #[test]
    fn missing_required_is_reported_by_name() {
        let raw = RawParams::new().with("password", "p").with("zoneid", "5");
        let err = bind(&raw, DESCRIPTORS).unwrap_err();
        assert_eq!(err, CommandError::missing("url"));
    }

    #[test]
    fn first_violation_in_declaration_order_wins() {
        // Both clusterid (bad type) and url (missing) are wrong; clusterid is
        // declared first.
        let raw = RawParams::new()
            .with("clusterid", "abc")
            .with("password", "p")
            .with("zoneid", "5");
        let err = bind(&raw, DESCRIPTORS).unwrap_err();
        assert_eq!(err, CommandError::coercion("clusterid", "LONG", "abc"));
    }

    #[test]
    fn typed_accessors_do_not_cross_kinds() {
        let bound = bind(&valid(), DESCRIPTORS).unwrap();
        assert_eq!(bound.string("zoneid"), None);
        assert_eq!(bound.long("url"), None);
    }

    #[test]
    fn debug_redacts_sensitive_values() {
        let bound = bind(&valid().with("password", "hunter2"), DESCRIPTORS).unwrap();
        let rendered = format!("{bound:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("http://h"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any well-typed request binds and every required field is present.
        #[test]
        fn valid_requests_always_bind(
            zone in any::<i64>(),
            cluster in proptest::option::of(any::<i64>()),
            url in "[a-z]{1,10}://[a-z0-9.]{1,20}",
            password in "[ -~]{0,20}",
        ) {
            let mut raw = RawParams::new()
                .with("password", password.clone())
                .with("url", url.clone())
                .with("zoneid", zone.to_string());
            if let Some(c) = cluster {
                raw.insert("clusterid", c.to_string());
            }

            let bound = bind(&raw, DESCRIPTORS).unwrap();
            for d in DESCRIPTORS.iter().filter(|d| d.required) {
                prop_assert!(bound.contains(d.name));
            }
            prop_assert_eq!(bound.long("zoneid"), Some(zone));
            prop_assert_eq!(bound.long("clusterid"), cluster);
            prop_assert_eq!(bound.string("password"), Some(password.as_str()));
        }

        /// Property: dropping any required parameter fails with that parameter's name.
        #[test]
        fn dropping_a_required_parameter_fails(idx in 0usize..3) {
            let required = ["password", "url", "zoneid"];
            let mut raw = RawParams::new();
            for (i, (name, value)) in [("password", "p"), ("url", "http://h"), ("zoneid", "5")]
                .into_iter()
                .enumerate()
            {
                if i != idx {
                    raw.insert(name, value);
                }
            }
            let err = bind(&raw, DESCRIPTORS).unwrap_err();
            prop_assert_eq!(err, CommandError::missing(required[idx]));
        }
    }
}
