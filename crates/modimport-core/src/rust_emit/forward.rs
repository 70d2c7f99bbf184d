use super::*;

impl Emitter<'_> {
    /// One forwarding function per signature, dispatching through its slot.
    pub(super) fn emit_forwarders(&mut self) {
        let plan = self.plan.clone();
        let import_error = self.rt("ImportError");

        for m in &plan {
            self.line("");
            let shape = self.describe(m);
            self.doc(&format!("Forwards to `{shape}`."));

            let params: Vec<String> = m
                .params
                .iter()
                .map(|p| format!("{}: {}", p.ident, p.modes.definition.render_type(p.ty)))
                .collect();
            let ret = m.return_type().unwrap_or("()");
            self.line(&format!(
                "pub fn {}({}) -> ::core::result::Result<{ret}, {import_error}> {{",
                m.ident,
                params.join(", ")
            ));
            self.indent += 1;

            let args: Vec<String> = m
                .params
                .iter()
                .map(|p| p.modes.forward.render_arg(&p.ident))
                .collect();
            self.line(&format!(
                "::core::result::Result::Ok((self::IMPORTS.forward({}, |__slots| __slots.{})?)({}))",
                rust_str_literal(&m.name),
                m.ident,
                args.join(", ")
            ));

            self.indent -= 1;
            self.line("}");
        }
    }
}
