use super::*;

impl Emitter<'_> {
    /// Callable type aliases, the `Slots` struct and its `SlotTable` impl.
    pub(super) fn emit_binding_table(&mut self) {
        let plan = self.plan.clone();

        for m in &plan {
            self.line("");
            let shape = self.describe(m);
            self.doc(&format!("Callable shape of `{shape}`."));
            self.line(&format!("pub type {} = {};", m.alias(), fn_pointer_type(m)));
        }

        self.line("");
        self.doc("Binding table: one slot per imported method, empty until attached.");
        self.line("#[derive(Clone, Copy, Default)]");
        self.line("pub struct Slots {");
        self.indent += 1;
        for m in &plan {
            self.line(&format!(
                "pub {}: ::core::option::Option<{}>,",
                m.ident,
                m.alias()
            ));
        }
        self.indent -= 1;
        self.line("}");

        self.line("");
        self.line("impl Slots {");
        self.indent += 1;
        self.line("pub const UNRESOLVED: Self = Self {");
        self.indent += 1;
        for m in &plan {
            self.line(&format!("{}: ::core::option::Option::None,", m.ident));
        }
        self.indent -= 1;
        self.line("};");
        self.indent -= 1;
        self.line("}");

        self.line("");
        let slot_table = self.rt("SlotTable");
        self.line(&format!("impl {slot_table} for Slots {{"));
        self.indent += 1;
        let names: Vec<String> = plan.iter().map(|m| rust_str_literal(&m.name)).collect();
        self.line(&format!(
            "const NAMES: &'static [&'static str] = &[{}];",
            names.join(", ")
        ));
        self.line("");
        self.line("fn resolution(&self) -> ::std::vec::Vec<bool> {");
        self.indent += 1;
        let checks: Vec<String> = plan
            .iter()
            .map(|m| format!("self.{}.is_some()", m.ident))
            .collect();
        self.line(&format!("::std::vec![{}]", checks.join(", ")));
        self.indent -= 1;
        self.line("}");
        self.indent -= 1;
        self.line("}");
    }
}

/// `fn(&mut i32, &str) -> bool`, shaped by the delegate projection.
fn fn_pointer_type(m: &PlannedMethod<'_>) -> String {
    let params: Vec<String> = m
        .params
        .iter()
        .map(|p| p.modes.delegate.render_type(p.ty))
        .collect();
    match m.return_type() {
        Some(ret) => format!("fn({}) -> {ret}", params.join(", ")),
        None => format!("fn({})", params.join(", ")),
    }
}
