//! Builder-pattern printer for dumping a resolution table.
//!
//! Output is deterministic (insertion order) and used by snapshot tests.

use std::fmt::Write;

use crate::domain::Domains;
use crate::form::{EnumLiteral, Field, Form};
use crate::inheritance::unified_fields;
use crate::table::{Table, Type};
use crate::type_ref::TypeParam;

pub struct TablePrinter<'t> {
    table: &'t Table,
    namespace: Option<&'t str>,
    unified: bool,
    domains: bool,
}

impl<'t> TablePrinter<'t> {
    pub fn new(table: &'t Table) -> Self {
        Self {
            table,
            namespace: None,
            unified: false,
            domains: false,
        }
    }

    /// Only dump types of this namespace.
    pub fn namespace(mut self, namespace: &'t str) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Print flattened struct fields instead of the declared ones.
    pub fn unified(mut self, value: bool) -> Self {
        self.unified = value;
        self
    }

    pub fn with_domains(mut self, value: bool) -> Self {
        self.domains = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let types = self
            .table
            .user_types()
            .filter(|ty| self.namespace.is_none_or(|ns| ty.namespace == ns));
        for ty in types {
            self.format_type(ty, w)?;
        }
        Ok(())
    }

    fn format_type(&self, ty: &Type, w: &mut impl Write) -> std::fmt::Result {
        write!(w, "{} {}", ty.form.kind_name(), ty.qualified_name)?;
        format_params(ty.form.type_params(), w)?;

        match &ty.form {
            Form::Struct(form) => {
                if form.has_extends() {
                    w.write_str(" extends ")?;
                    for (i, parent) in form.extends.iter().enumerate() {
                        if i > 0 {
                            w.write_str(", ")?;
                        }
                        write!(w, "{}", parent)?;
                    }
                }
                if form.has_key_domain {
                    w.write_str(" [key]")?;
                }
                if form.is_recursive {
                    w.write_str(" [recursive]")?;
                }
                self.format_domains(&ty.domains, w)?;
                writeln!(w)?;

                let fields = if self.unified {
                    unified_fields(ty, self.table)
                } else {
                    form.fields.clone()
                };
                for field in &fields {
                    self.format_field(field, w)?;
                }
                if !self.unified {
                    for omitted in &form.omitted_fields {
                        writeln!(w, "  -{}", omitted)?;
                    }
                }
            }
            Form::Enum(form) => {
                w.write_str(if form.is_int_enum { " (int)" } else { " (string)" })?;
                self.format_domains(&ty.domains, w)?;
                writeln!(w)?;
                for value in &form.values {
                    match &value.value {
                        EnumLiteral::Int(v) => write!(w, "  {} = {}", value.name, v)?,
                        EnumLiteral::Str(s) => write!(w, "  {} = {:?}", value.name, s)?,
                    }
                    self.format_domains(&value.domains, w)?;
                    writeln!(w)?;
                }
            }
            Form::Alias(form) => {
                write!(w, " = {}", form.target)?;
                self.format_domains(&ty.domains, w)?;
                writeln!(w)?;
            }
            Form::Distinct(form) => {
                write!(w, " {}", form.base)?;
                self.format_domains(&ty.domains, w)?;
                writeln!(w)?;
            }
            Form::Builtin { .. } | Form::Primitive { .. } => writeln!(w)?,
        }
        Ok(())
    }

    fn format_field(&self, field: &Field, w: &mut impl Write) -> std::fmt::Result {
        write!(w, "  {} {}{}", field.name, field.ty, field.optionality.marker())?;
        self.format_domains(&field.domains, w)?;
        writeln!(w)
    }

    fn format_domains(&self, domains: &Domains, w: &mut impl Write) -> std::fmt::Result {
        if !self.domains {
            return Ok(());
        }
        for domain in domains.values() {
            write!(w, " {}", domain)?;
        }
        Ok(())
    }
}

fn format_params(params: &[TypeParam], w: &mut impl Write) -> std::fmt::Result {
    if params.is_empty() {
        return Ok(());
    }
    w.write_str("<")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            w.write_str(", ")?;
        }
        write!(w, "{}", param)?;
    }
    w.write_str(">")
}

impl Table {
    pub fn printer(&self) -> TablePrinter<'_> {
        TablePrinter::new(self)
    }
}
