//! The concrete `AdvanceFn` (spec §4.1, §4.3): one dispatcher plus one
//! submodule per declaration kind the Declaration Visitor can stub out.

mod aggregate;
mod alias;
mod class;
mod enum_;
mod function;
mod interface;
mod module;
mod variable;

pub mod template;

#[cfg(test)]
mod class_tests;

use crate::error::Result;
use crate::ids::SymbolId;
use crate::scheduler::Scheduler;
use crate::stage::Stage;
use crate::symbol::SymbolKind;

/// Drives `sym` towards `target`, dispatched by its `SymbolKind`. This is
/// the function every `Scheduler` in this crate is constructed with.
pub fn advance(scheduler: &mut Scheduler, sym: SymbolId, target: Stage) -> Result<()> {
    let decl = scheduler.declaration(sym).cloned();

    match scheduler.symbols.get(sym).kind.clone() {
        SymbolKind::Module { .. } => module::analyze(scheduler, sym, target, decl),
        SymbolKind::Function(_) => function::analyze(scheduler, sym, target, decl),
        SymbolKind::Method(..) => function::analyze(scheduler, sym, target, decl),
        SymbolKind::Variable(_) | SymbolKind::Field(_) => variable::analyze(scheduler, sym, target, decl),
        SymbolKind::Struct { .. } => aggregate::analyze_struct(scheduler, sym, target, decl),
        SymbolKind::Union { .. } => aggregate::analyze_union(scheduler, sym, target, decl),
        SymbolKind::Class(_) => class::analyze(scheduler, sym, target, decl),
        SymbolKind::Interface(_) => interface::analyze(scheduler, sym, target, decl),
        SymbolKind::Enum(_) => enum_::analyze(scheduler, sym, target, decl),
        SymbolKind::Template(_) => template::analyze_template(scheduler, sym, target, decl),
        SymbolKind::TemplateInstance(_) => template::analyze_instance(scheduler, sym, target),
        SymbolKind::TypeAlias(_) => alias::analyze_type_alias(scheduler, sym, target, decl),
        SymbolKind::ValueAlias(_) => alias::analyze_value_alias(scheduler, sym, target, decl),
        SymbolKind::SymbolAlias(_) => alias::analyze_symbol_alias(scheduler, sym, target, decl),
        // Template parameters and overload sets are fully resolved the
        // instant the Declaration Visitor / `add_overloadable` create
        // them; `require`ing either just needs to observe that.
        SymbolKind::OverloadSet { .. }
        | SymbolKind::TypeTemplateParameter(_)
        | SymbolKind::ValueTemplateParameter(_)
        | SymbolKind::AliasTemplateParameter(_)
        | SymbolKind::TypedAliasTemplateParameter(_) => {
            scheduler.symbols.get_mut(sym).advance_to(target);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::Visibility;
    use crate::symbol::Symbol;
    use crate::ty::Linkage;
    use sdc_core::Span;

    /// An `OverloadSet` has no declaration of its own — `advance` must not
    /// try to look one up before dispatching on its `SymbolKind`.
    #[test]
    fn overload_set_advances_without_a_declaration() {
        let mut scheduler = Scheduler::new_bare(advance);
        let name = scheduler.interner.intern("foo");
        let sym = scheduler.symbols.insert(Symbol::stub(
            Span::synthetic(),
            name,
            Linkage::D,
            Visibility::Public,
            SymbolKind::OverloadSet { members: Vec::new() },
        ));

        scheduler.require(sym, Stage::Processed).unwrap();
        assert_eq!(scheduler.symbols.get(sym).step, Stage::Processed);
    }

    #[test]
    fn dispatch_routes_variables_and_fields_through_the_same_analyzer() {
        let mut scheduler = Scheduler::new_bare(advance);
        let name = scheduler.interner.intern("x");
        let sym = scheduler.symbols.insert(Symbol::stub(
            Span::synthetic(),
            name,
            Linkage::D,
            Visibility::Public,
            SymbolKind::Field(Default::default()),
        ));
        let decl = crate::ast::Decl {
            span: Span::synthetic(),
            name,
            linkage: Linkage::D,
            visibility: Visibility::Public,
            kind: crate::ast::DeclKind::Variable(crate::ast::VariableDecl {
                ty: Some(crate::ty::Type::Builtin(crate::ty::BuiltinType::Int)),
                initializer: None,
                is_static: true,
            }),
        };
        scheduler.schedule(sym, decl);

        scheduler.require(sym, Stage::Signed).unwrap();
        assert_eq!(scheduler.symbols.get(sym).step, Stage::Signed);
    }
}
