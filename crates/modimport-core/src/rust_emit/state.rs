use super::*;

impl Emitter<'_> {
    /// The surface's `ImportCell` and the entry points around it.
    pub(super) fn emit_import_state(&mut self) {
        let cell = self.rt("ImportCell");
        let meta = self.rt("SurfaceMeta");
        let load_error = self.rt("LoadError");
        let state = self.rt("ImportState");

        self.line("");
        self.line(&format!("static IMPORTS: {cell}<Slots> = {cell}::new("));
        self.indent += 1;
        self.line(&format!("{meta}::new(SURFACE_NAME, REQUIRED),"));
        self.line("Slots::UNRESOLVED,");
        self.indent -= 1;
        self.line(");");

        self.line("");
        if self.surface.meta.required {
            self.doc("Binds the surface. Fails unless every method resolved.");
        } else {
            self.doc("Binds the surface. A wholly absent provider is tolerated; a partial one fails.");
        }
        self.line(&format!(
            "pub fn load() -> ::core::result::Result<(), {load_error}> {{"
        ));
        self.indent += 1;
        self.line("self::IMPORTS.load()");
        self.indent -= 1;
        self.line("}");

        self.line("");
        self.doc("True once `load()` found every method.");
        self.line("pub fn is_imported() -> bool {");
        self.indent += 1;
        self.line("self::IMPORTS.is_imported()");
        self.indent -= 1;
        self.line("}");

        self.line("");
        self.doc("State derived by the last `load()`; `NotImported` before the first.");
        self.line(&format!("pub fn import_state() -> {state} {{"));
        self.indent += 1;
        self.line("self::IMPORTS.state()");
        self.indent -= 1;
        self.line("}");

        self.line("");
        self.doc("Writes slots. Call `load()` afterwards to re-derive the import state.");
        self.doc("");
        self.doc("`bind` runs with the surface locked: it must not call back into this module.");
        self.line("pub fn attach<R>(bind: impl FnOnce(&mut Slots) -> R) -> R {");
        self.indent += 1;
        self.line("self::IMPORTS.attach(bind)");
        self.indent -= 1;
        self.line("}");
    }
}
