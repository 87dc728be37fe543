//! C# source rendering.
//!
//! Everything here is plain text assembly; all decisions about *what* to
//! render are made in [`crate::emit`].

use std::fmt::{self, Write as _};

use cqrsgen_decl::{
    ExtensionPoint, InjectionStub, ResolvedConfig, DEFAULT_LIFETIME, LIFETIME_PARAMETER_NAME,
    SERVICES_PARAMETER_NAME, SERVICE_COLLECTION_TYPE, SERVICE_DESCRIPTOR_TYPE,
    SERVICE_LIFETIME_TYPE,
};

/// First line of every generated unit.
pub const AUTO_GENERATED_HEADER: &str = "// <auto-generated/>";

const INDENT: &str = "    ";

/// Line-oriented writer that tracks brace depth.
struct CodeWriter {
    out: String,
    depth: usize,
}

impl CodeWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: impl fmt::Display) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        writeln!(self.out, "{}", text)
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self) -> fmt::Result {
        self.line("{")?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) -> fmt::Result {
        self.depth = self.depth.saturating_sub(1);
        self.line("}")
    }

    fn finish(self) -> String {
        self.out
    }
}

fn global(name: &str) -> String {
    format!("global::{}", name)
}

/// Joins declaration modifiers, skipping empty ones.
fn modifiers(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Everything that differs between a completed and a synthesized method.
struct MethodShape<'a> {
    namespace: &'a str,
    class_declaration: String,
    method_modifiers: String,
    method_name: &'a str,
    services: &'a str,
    lifetime: &'a str,
    restate_default: bool,
}

fn write_header(w: &mut CodeWriter) -> fmt::Result {
    w.line(AUTO_GENERATED_HEADER)?;
    w.line("#nullable enable")
}

fn write_method(
    w: &mut CodeWriter,
    shape: &MethodShape<'_>,
    stubs: &[InjectionStub],
) -> fmt::Result {
    let scoped = !shape.namespace.is_empty();
    if scoped {
        w.line(format_args!("namespace {}", shape.namespace))?;
        w.open()?;
    }

    w.line(&shape.class_declaration)?;
    w.open()?;

    let default = if shape.restate_default {
        format!(" = {}", global(DEFAULT_LIFETIME))
    } else {
        String::new()
    };
    w.line(format_args!(
        "{} {} {}(this {} {}, {} {}{})",
        shape.method_modifiers,
        global(SERVICE_COLLECTION_TYPE),
        shape.method_name,
        global(SERVICE_COLLECTION_TYPE),
        shape.services,
        global(SERVICE_LIFETIME_TYPE),
        shape.lifetime,
        default
    ))?;
    w.open()?;
    for stub in stubs {
        w.line(registration(stub, shape.services, shape.lifetime))?;
    }
    w.line(format_args!("return {};", shape.services))?;
    w.close()?;

    w.close()?;
    if scoped {
        w.close()?;
    }
    Ok(())
}

/// One registration statement binding `stub` under `lifetime`.
pub fn registration(stub: &InjectionStub, services: &str, lifetime: &str) -> String {
    format!(
        "{}.Add(new {}(typeof({}), typeof({}), {}));",
        services,
        global(SERVICE_DESCRIPTOR_TYPE),
        stub.service_type(),
        stub.implementation,
        lifetime
    )
}

/// Renders completions for every extension point into one unit.
///
/// Each completion reuses its declaration's namespace, class, accessibility
/// and parameter names; the lifetime default is restated only when the
/// declaration has none.
pub fn completion_unit(
    points: &[ExtensionPoint],
    stubs: &[InjectionStub],
) -> Result<String, fmt::Error> {
    let mut w = CodeWriter::new();
    write_header(&mut w)?;

    for point in points {
        w.blank();
        let shape = MethodShape {
            namespace: &point.namespace,
            class_declaration: modifiers(&[
                point.class_accessibility.type_keyword(),
                "static partial class",
                point.class_name.as_str(),
            ]),
            method_modifiers: modifiers(&[
                point.method_accessibility.method_keyword(),
                "static partial",
            ]),
            method_name: &point.method_name,
            services: &point.services_parameter,
            lifetime: &point.lifetime_parameter,
            restate_default: !point.lifetime_has_default,
        };
        write_method(&mut w, &shape, stubs)?;
    }

    Ok(w.finish())
}

/// Renders a standalone extension class named from the resolved settings.
pub fn synthesized_unit(
    config: &ResolvedConfig,
    method_name: &str,
    stubs: &[InjectionStub],
) -> Result<String, fmt::Error> {
    let mut w = CodeWriter::new();
    write_header(&mut w)?;
    w.blank();

    let shape = MethodShape {
        namespace: &config.namespace,
        class_declaration: modifiers(&[
            config.access_modifier.as_str(),
            "static class",
            config.class_name.as_str(),
        ]),
        method_modifiers: modifiers(&[config.access_modifier.as_str(), "static"]),
        method_name,
        services: SERVICES_PARAMETER_NAME,
        lifetime: LIFETIME_PARAMETER_NAME,
        restate_default: true,
    };
    write_method(&mut w, &shape, stubs)?;

    Ok(w.finish())
}
