// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Standard-type seeding.
//!
//! Installs the canonical fixed-width numerics plus the complete lexical
//! alias space of the C integer spellings. The spellings are generated
//! from modifier multisets, not hand-written: for each width class the
//! optional sign keyword and `int` keyword are combined with the base
//! tokens and every distinct ordering becomes an alias
//! (`/unsigned long int`, `/long unsigned int`, `/int long unsigned`,
//! ...). Widths come from the registry's [`CWidths`] table.
//!
//! [`CWidths`]: crate::CWidths

use crate::containers::{StdString, StdVector};
use crate::error::Result;
use crate::model::{NumericKind, Type};
use crate::registry::Registry;

/// Populate a fresh registry with the standard types.
///
/// Idempotent: numerics are skipped when `/bool` is already present,
/// the string container when `/std/string` is.
pub fn seed_standard_types(registry: &mut Registry) -> Result<()> {
    if !registry.has("/bool") {
        seed_numerics(registry)?;
    }
    if !registry.has("/std/string") {
        let kinds = registry.container_kinds_mut();
        if kinds.get(StdString::NAME).is_none() {
            kinds.register(Box::new(StdString));
        }
        if kinds.get(StdVector::NAME).is_none() {
            kinds.register(Box::new(StdVector));
        }
        registry.build_container(StdString::NAME, &[])?;
    }
    Ok(())
}

fn seed_numerics(registry: &mut Registry) -> Result<()> {
    registry.add(Type::null("/nil")?)?;
    registry.alias("/nil", "/void")?;

    for size in [1usize, 2, 4, 8] {
        let bits = size * 8;
        registry.add(Type::numeric(
            format!("/int{}_t", bits),
            size,
            NumericKind::SInt,
        )?)?;
        registry.add(Type::numeric(
            format!("/uint{}_t", bits),
            size,
            NumericKind::UInt,
        )?)?;
    }

    registry.alias("/int8_t", "/signed char")?;
    registry.alias("/uint8_t", "/unsigned char")?;

    registry.add(Type::character("/char8_t", 1)?)?;
    registry.alias("/char8_t", "/char")?;

    let widths = registry.config().c_widths;
    let classes: [(&[&str], usize); 4] = [
        (&["short"], widths.short_bytes),
        (&[], widths.int_bytes),
        (&["long"], widths.long_bytes),
        (&["long", "long"], widths.long_long_bytes),
    ];

    let mut alias_count = 0usize;
    for (base, bytes) in classes {
        for unsigned in [false, true] {
            let target = if unsigned {
                format!("/uint{}_t", bytes * 8)
            } else {
                format!("/int{}_t", bytes * 8)
            };
            let sign: &[&str] = if unsigned { &["unsigned"] } else { &["signed"] };

            // with and without the sign keyword, with and without `int`
            for sign_tokens in [&[][..], sign] {
                // plain `int` spellings only exist for the signed side
                if sign_tokens.is_empty() && unsigned {
                    continue;
                }
                for int_tokens in [&[][..], &["int"][..]] {
                    let mut tokens: Vec<&str> = Vec::new();
                    tokens.extend_from_slice(base);
                    tokens.extend_from_slice(int_tokens);
                    tokens.extend_from_slice(sign_tokens);
                    if tokens.is_empty() {
                        continue;
                    }
                    for ordering in distinct_orderings(&tokens) {
                        let name = format!("/{}", ordering.join(" "));
                        registry.alias(&target, &name)?;
                        alias_count += 1;
                    }
                }
            }
        }
    }

    registry.add(Type::numeric("/float", 4, NumericKind::Float)?)?;
    registry.add(Type::numeric("/double", 8, NumericKind::Float)?)?;
    registry.add(Type::numeric("/bool", 1, NumericKind::UInt)?)?;

    crate::debug!("seeded standard types with {} C spelling aliases", alias_count);
    Ok(())
}

/// All distinct orderings of a token multiset (`["long", "long", "int"]`
/// has three, not six).
fn distinct_orderings<'a>(tokens: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut pool: Vec<&str> = tokens.to_vec();
    pool.sort_unstable();
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(pool.len());
    let mut used = vec![false; pool.len()];
    permute(&pool, &mut used, &mut current, &mut out);
    out
}

fn permute<'a>(
    pool: &[&'a str],
    used: &mut [bool],
    current: &mut Vec<&'a str>,
    out: &mut Vec<Vec<&'a str>>,
) {
    if current.len() == pool.len() {
        out.push(current.clone());
        return;
    }
    for i in 0..pool.len() {
        if used[i] {
            continue;
        }
        // skip a token equal to its unused predecessor: same ordering
        if i > 0 && pool[i] == pool[i - 1] && !used[i - 1] {
            continue;
        }
        used[i] = true;
        current.push(pool[i]);
        permute(pool, used, current, out);
        current.pop();
        used[i] = false;
    }
}
