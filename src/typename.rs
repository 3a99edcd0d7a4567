//! Canonical type keys.
//!
//! [`normalize`] turns a [`TypeSignature`] into the string that identifies the type in an
//! API tree. The key only depends on the type's identity (namespace, name, declaring-type
//! chain, generic arity and composition), never on tokens or table order, so the same type
//! produces the same key in every version of an assembly.
//!
//! | Shape | Key |
//! |---|---|
//! | named type | `System.Collections.Hashtable` |
//! | nested type | `System.Environment+SpecialFolder` |
//! | generic instance | ``System.Collections.Generic.Dictionary`2[System.String,System.Int32]`` |
//! | array | `System.Int32[]`, `System.Int32[,]` |
//! | by-ref / pointer | `System.Int32&`, `System.Byte*` |
//! | modifiers | `System.Int32 modreq(System.Runtime.CompilerServices.IsVolatile)` |
//! | generic parameter | `T` |
//! | function pointer | `method System.Void *(System.Int32)` |

use std::borrow::Cow;

use crate::{
    metadata::{
        definitions::ParameterDefinition,
        signatures::{SignatureArray, SignatureMethod, TypeName, TypeSignature},
    },
    Result,
};

/// Rewrite characters that must not appear in a type key: `<` → `[`, `>` → `]`, `/` → `+`.
#[must_use]
pub fn cleanup(name: &str) -> Cow<'_, str> {
    if !name.contains(['<', '>', '/']) {
        return Cow::Borrowed(name);
    }
    Cow::Owned(
        name.chars()
            .map(|c| match c {
                '<' => '[',
                '>' => ']',
                '/' => '+',
                other => other,
            })
            .collect(),
    )
}

/// Key of a named type: `Namespace.Name`, nested types joined with `+`.
#[must_use]
pub fn type_name_key(name: &TypeName) -> String {
    let mut out = String::new();
    write_type_name(&mut out, name);
    out
}

fn write_type_name(out: &mut String, name: &TypeName) {
    match &name.declaring {
        Some(declaring) => {
            write_type_name(out, declaring);
            out.push('+');
        }
        None if !name.namespace.is_empty() => {
            out.push_str(&cleanup(&name.namespace));
            out.push('.');
        }
        None => {}
    }
    out.push_str(&cleanup(&name.name));
}

/// Compute the canonical key of a type reference.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for signatures that cannot describe a type: an array
/// of rank 0, a generic instantiation whose element is not a named type, or one without
/// type arguments.
pub fn normalize(signature: &TypeSignature) -> Result<String> {
    let mut out = String::new();
    write_signature(&mut out, signature)?;
    Ok(out)
}

fn write_signature(out: &mut String, signature: &TypeSignature) -> Result<()> {
    if let Some((namespace, name)) = signature.primitive_name() {
        out.push_str(namespace);
        out.push('.');
        out.push_str(name);
        return Ok(());
    }

    match signature {
        TypeSignature::Class(name) | TypeSignature::ValueType(name) => write_type_name(out, name),
        TypeSignature::GenericParamType { index, name } => {
            if name.is_empty() {
                out.push_str(&format!("!{index}"));
            } else {
                out.push_str(&cleanup(name));
            }
        }
        TypeSignature::GenericParamMethod { index, name } => {
            if name.is_empty() {
                out.push_str(&format!("!!{index}"));
            } else {
                out.push_str(&cleanup(name));
            }
        }
        TypeSignature::GenericInst(base, args) => {
            if !matches!(**base, TypeSignature::Class(_) | TypeSignature::ValueType(_)) {
                return Err(malformed_error!(
                    "Generic instantiation over a non-named type - {:?}",
                    base
                ));
            }
            if args.is_empty() {
                return Err(malformed_error!("Generic instantiation without type arguments"));
            }
            write_signature(out, base)?;
            out.push('[');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_signature(out, arg)?;
            }
            out.push(']');
        }
        TypeSignature::Ptr(base) => {
            write_signature(out, base)?;
            out.push('*');
        }
        TypeSignature::ByRef(base) => {
            write_signature(out, base)?;
            out.push('&');
        }
        TypeSignature::SzArray(base) => {
            write_signature(out, base)?;
            out.push_str("[]");
        }
        TypeSignature::Array(array) => write_array(out, array)?,
        TypeSignature::ModifiedRequired { modifier, base } => {
            write_signature(out, base)?;
            out.push_str(" modreq(");
            write_type_name(out, modifier);
            out.push(')');
        }
        TypeSignature::ModifiedOptional { modifier, base } => {
            write_signature(out, base)?;
            out.push_str(" modopt(");
            write_type_name(out, modifier);
            out.push(')');
        }
        TypeSignature::Pinned(base) => {
            write_signature(out, base)?;
            out.push_str(" pinned");
        }
        TypeSignature::FnPtr(method) => write_function_pointer(out, method)?,
        TypeSignature::Sentinel => out.push_str("..."),
        // primitives are handled above
        _ => return Err(malformed_error!("Unexpected element type - {:?}", signature)),
    }
    Ok(())
}

fn write_array(out: &mut String, array: &SignatureArray) -> Result<()> {
    if array.rank == 0 {
        return Err(malformed_error!("Array with rank 0"));
    }

    write_signature(out, &array.base)?;
    out.push('[');
    for dim in 0..array.rank {
        if dim > 0 {
            out.push(',');
        }
        let Some(bounds) = array.dimensions.get(dim as usize) else {
            continue;
        };
        if bounds.size.is_none() && bounds.lower_bound.is_none() {
            continue;
        }
        let lower = bounds.lower_bound.unwrap_or(0);
        out.push_str(&lower.to_string());
        out.push_str("...");
        if let Some(size) = bounds.size {
            out.push_str(&(u64::from(lower) + u64::from(size)).saturating_sub(1).to_string());
        }
    }
    out.push(']');
    Ok(())
}

fn write_function_pointer(out: &mut String, method: &SignatureMethod) -> Result<()> {
    out.push_str("method");
    if method.param_count_generic > 0 {
        out.push_str(&format!("`{}", method.param_count_generic));
    }
    out.push(' ');
    if method.has_this {
        out.push_str("instance ");
    }
    if method.explicit_this {
        out.push_str("explicit ");
    }
    let convention = if method.cdecl {
        Some("cdecl")
    } else if method.stdcall {
        Some("stdcall")
    } else if method.thiscall {
        Some("thiscall")
    } else if method.fastcall {
        Some("fastcall")
    } else if method.vararg {
        Some("vararg")
    } else {
        None
    };
    if let Some(convention) = convention {
        out.push_str("unmanaged ");
        out.push_str(convention);
        out.push(' ');
    }
    write_signature(out, &method.return_type)?;
    out.push_str(" *(");
    for (i, param) in method.params.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_signature(out, param)?;
    }
    out.push(')');
    Ok(())
}

/// Parameter list of a method as it appears in member names: type keys joined by `", "`,
/// by-ref parameters prefixed with `in ` or `out ` when flagged so.
///
/// # Errors
/// Propagates [`normalize`] failures.
pub fn parameter_signature(params: &[ParameterDefinition]) -> Result<String> {
    let mut parts = Vec::with_capacity(params.len());
    for param in params {
        let mut part = String::new();
        if param.param_type.is_by_ref() {
            if param.is_in() {
                part.push_str("in ");
            } else if param.is_out() {
                part.push_str("out ");
            }
        }
        write_signature(&mut part, &param.param_type)?;
        parts.push(part);
    }
    Ok(parts.join(", "))
}
