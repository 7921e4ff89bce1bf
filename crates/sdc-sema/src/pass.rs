//! The pass's external surface (spec §6): construction, module
//! registration, termination, and the `buildMain` bootstrap.
//!
//! `Parser` is an out-of-scope collaborator (spec §1 Non-goals), so `add`
//! takes an already-parsed [`ast::AstModule`] rather than a filename —
//! whatever assembles a `SemanticPass` is responsible for invoking the
//! parser itself and handing this crate its output.

use sdc_core::{Interner, Span};

use crate::analyze;
use crate::ast::AstModule;
use crate::attrs::Visibility;
use crate::config::SemaConfig;
use crate::datalayout::DataLayout;
use crate::error::{Result, SemaError};
use crate::evaluator::Evaluator;
use crate::ids::SymbolId;
use crate::mangle;
use crate::scheduler::Scheduler;
use crate::scope::ScopeKind;
use crate::stage::Stage;
use crate::symbol::{ClassPayload, FunctionPayload, Symbol, SymbolKind};
use crate::ty::{BuiltinType, FunctionType, Linkage, Type};

pub struct SemanticPass {
    scheduler: Scheduler,
    modules: Vec<SymbolId>,
}

impl SemanticPass {
    /// `evalBuilder`/`layoutBuilder` in spec §6 are factories in the
    /// original design so a fresh `Evaluator`/`DataLayout` can be built per
    /// compilation unit; here they're just the already-built collaborators,
    /// since this crate has no concurrency model that would need more than
    /// one instance (spec §5).
    pub fn new(interner: Interner, config: SemaConfig, evaluator: Box<dyn Evaluator>, layout: Box<dyn DataLayout>) -> Self {
        let mut scheduler = Scheduler::new(analyze::advance, interner, config, evaluator, layout);
        bootstrap_object(&mut scheduler);
        Self {
            scheduler,
            modules: Vec::new(),
        }
    }

    /// Register `module`'s declarations and drive it to `Populated` —
    /// enough for other modules to resolve identifiers into it before
    /// `terminate` drives everything the rest of the way.
    pub fn add(&mut self, name: &str, module: AstModule) -> Result<SymbolId> {
        let module_name = self.scheduler.interner.intern(name);
        let sym = self.scheduler.symbols.insert(Symbol::stub(
            module.span,
            module_name,
            Linkage::D,
            Visibility::Public,
            SymbolKind::Module { is_package: false },
        ));
        self.scheduler.schedule_module(sym, module.decls);
        self.scheduler.require(sym, Stage::Populated)?;
        self.modules.push(sym);
        Ok(sym)
    }

    pub fn terminate(&mut self) -> Result<()> {
        self.scheduler.terminate()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Locate the unique top-level `main` across every registered module
    /// and synthesize the `_Dmain` bootstrap (spec §6): `int _Dmain()`
    /// that calls the user's `main` and, if it returns `void`, returns `0`
    /// in its place — otherwise forwards `main`'s own return value.
    pub fn build_main(&mut self) -> Result<SymbolId> {
        let main_name = self.scheduler.interner.intern("main");
        let mut candidates = Vec::new();
        for &module in &self.modules {
            let members = self.scheduler.module_members(module).cloned().unwrap_or_default();
            for member in members {
                if self.scheduler.symbols.get(member).name == main_name
                    && matches!(self.scheduler.symbols.get(member).kind, SymbolKind::Function(_))
                {
                    candidates.push(member);
                }
            }
        }

        let user_main = match candidates.as_slice() {
            [one] => *one,
            [] => {
                return Err(SemaError::UnsupportedConstruct {
                    what: "no top-level `main` found".to_string(),
                    span: Span::synthetic(),
                })
            }
            _ => {
                return Err(SemaError::UnsupportedConstruct {
                    what: "more than one top-level `main` found".to_string(),
                    span: Span::synthetic(),
                })
            }
        };

        self.scheduler.require(user_main, Stage::Processed)?;

        let bootstrap_name = self.scheduler.interner.intern("_Dmain");
        let function_type = FunctionType {
            params: Vec::new(),
            return_type: Box::new(Type::Builtin(BuiltinType::Int)),
            variadic: false,
            linkage: Linkage::C,
        };
        let mangled = mangle::finalize_c_mangle(&self.scheduler.interner, bootstrap_name);
        let mangle_name = self.scheduler.interner.intern(&mangled);

        let bootstrap = self.scheduler.symbols.insert(Symbol::stub(
            self.scheduler.symbols.get(user_main).location,
            bootstrap_name,
            Linkage::C,
            Visibility::Public,
            SymbolKind::Function(FunctionPayload {
                params: Vec::new(),
                return_type: Some(Type::Builtin(BuiltinType::Int)),
                is_constructor: false,
                variadic: false,
                ref_return: false,
            }),
        ));
        let symbol = self.scheduler.symbols.get_mut(bootstrap);
        symbol.mangle = Some(mangle_name);
        symbol.ty = Some(Type::Function(function_type));
        symbol.advance_to(Stage::Processed);
        Ok(bootstrap)
    }
}

/// The builtin `Object` root class (spec §6 `ObjectReference`): every
/// class without a written base implicitly derives from it, and every
/// module implicitly imports it. It has no source declaration, so it's
/// assembled directly rather than through `analyze::class`.
fn bootstrap_object(scheduler: &mut Scheduler) {
    let name = scheduler.interner.intern("Object");
    let scope = scheduler.scopes.create(ScopeKind::Symbol, None, None);
    let sym = scheduler.symbols.insert(Symbol::stub(
        Span::synthetic(),
        name,
        Linkage::D,
        Visibility::Public,
        SymbolKind::Class(ClassPayload::default()),
    ));

    let mangled = format!("{}{}", mangle::TAG_CLASS, mangle::mangle_identifier(&scheduler.interner, name));
    let mangle_name = scheduler.interner.intern(&mangled);

    let symbol = scheduler.symbols.get_mut(sym);
    symbol.scope = Some(scope);
    symbol.mangle = Some(mangle_name);
    symbol.ty = Some(Type::Aggregate(sym));
    symbol.advance_to(Stage::Processed);

    scheduler.object_class = Some(sym);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Decl, DeclKind, FunctionDecl, VariableDecl};
    use sdc_core::Span;

    fn new_pass() -> SemanticPass {
        let mut interner = Interner::new();
        let config = SemaConfig::new(&mut interner, "linux");
        SemanticPass::new(
            interner,
            config,
            Box::new(crate::evaluator::ConstFoldEvaluator),
            Box::new(crate::datalayout::Lp64Layout),
        )
    }

    fn main_decl(name: sdc_core::Name) -> Decl {
        Decl {
            span: Span::synthetic(),
            name,
            linkage: Linkage::D,
            visibility: Visibility::Public,
            kind: DeclKind::Function(FunctionDecl {
                params: Vec::new(),
                return_type: None,
                body: None,
                is_constructor: false,
                has_context: false,
                method: None,
                variadic: false,
                ref_return: false,
            }),
        }
    }

    #[test]
    fn constructing_a_pass_bootstraps_object() {
        let pass = new_pass();
        let object = pass.scheduler().object_class.expect("Object bootstrapped");
        assert_eq!(pass.scheduler().symbols.get(object).step, Stage::Processed);
    }

    #[test]
    fn build_main_synthesizes_the_bootstrap_symbol() {
        let mut pass = new_pass();
        let main_name = pass.scheduler_mut().interner.intern("main");
        let module = crate::ast::AstModule {
            name: main_name,
            span: Span::synthetic(),
            decls: vec![main_decl(main_name)],
        };
        pass.add("app", module).unwrap();

        let bootstrap = pass.build_main().unwrap();
        let mangle = pass.scheduler().symbols.get(bootstrap).mangle.unwrap();
        assert_eq!(pass.scheduler().interner.resolve(mangle), "_Dmain");
        assert_eq!(pass.scheduler().symbols.get(bootstrap).step, Stage::Processed);
    }

    #[test]
    fn build_main_fails_when_no_main_is_declared() {
        let mut pass = new_pass();
        let module = crate::ast::AstModule {
            name: pass.scheduler_mut().interner.intern("app"),
            span: Span::synthetic(),
            decls: Vec::new(),
        };
        pass.add("app", module).unwrap();

        let result = pass.build_main();
        assert!(matches!(result, Err(SemaError::UnsupportedConstruct { .. })));
    }

    #[test]
    fn terminate_drives_every_registered_module_to_processed() {
        let mut pass = new_pass();
        let x = pass.scheduler_mut().interner.intern("x");
        let module = crate::ast::AstModule {
            name: pass.scheduler_mut().interner.intern("app"),
            span: Span::synthetic(),
            decls: vec![Decl {
                span: Span::synthetic(),
                name: x,
                linkage: Linkage::D,
                visibility: Visibility::Public,
                kind: DeclKind::Variable(VariableDecl {
                    ty: Some(Type::Builtin(BuiltinType::Int)),
                    initializer: None,
                    is_static: true,
                }),
            }],
        };
        let module_sym = pass.add("app", module).unwrap();
        pass.terminate().unwrap();

        assert_eq!(pass.scheduler().symbols.get(module_sym).step, Stage::Processed);
    }
}
