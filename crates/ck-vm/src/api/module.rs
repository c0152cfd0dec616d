//! Foreign modules and the module path.

use ck_runtime::objects::{DictObj, ListObj, ModuleObj, ModuleState, StringObj};
use ck_runtime::{GcRef, HeapObject, Value};

use crate::modules::{ForeignFn, ForeignModule, NativeHandle};
use crate::vm::{Vm, VmResult};

impl Vm {
    /// Register a foreign module without loading it, and push the module.
    ///
    /// `loader` runs the first time script code imports `name`, on a new
    /// fiber with the module in slot 0. `handle` is kept until the module is
    /// unloaded or the VM is dropped. Registering a name again replaces the
    /// previous registration. On allocation failure `Null` is pushed.
    pub fn preload_foreign_module(
        &mut self,
        name: &str,
        path: Option<&str>,
        handle: Option<NativeHandle>,
        loader: ForeignFn,
    ) -> VmResult<()> {
        self.assert_can_push(1);
        let module = match self.create_module(name, path) {
            Ok(module) => module,
            Err(err) => {
                self.push(Value::Null);
                return Err(err);
            }
        };

        let entry = ForeignModule {
            module,
            handle,
            loader,
        };
        if self.modules.insert(name, entry).is_some() {
            log::warn!("foreign module {} registered twice, replacing", name);
        }
        log::debug!("preloaded foreign module {}", name);
        self.push(Value::Object(module));
        Ok(())
    }

    fn create_module(&mut self, name: &str, path: Option<&str>) -> VmResult<GcRef> {
        let name_ref = self.alloc(HeapObject::String(StringObj::new(name.as_bytes())))?;
        self.with_roots(&[name_ref], |vm| -> VmResult<GcRef> {
            let path_ref = path
                .map(|p| vm.alloc(HeapObject::String(StringObj::new(p.as_bytes()))))
                .transpose()?;
            vm.with_roots(path_ref.as_slice(), |vm| -> VmResult<GcRef> {
                let variables = vm.alloc(HeapObject::Dict(DictObj::new()))?;
                vm.with_roots(&[variables], |vm| {
                    let module = ModuleObj::new(name_ref, path_ref, variables);
                    vm.alloc(HeapObject::Module(module))
                })
            })
        })
    }

    /// Import the foreign module registered as `name` and push it.
    ///
    /// The first import runs the module's loader; later imports, including
    /// ones made by the loader itself, push the module as is. An unknown name
    /// pushes `Null` and returns `false`.
    pub fn import_module(&mut self, name: &str) -> VmResult<bool> {
        self.assert_can_push(1);
        let Some(entry) = self.modules.get(name) else {
            self.push(Value::Null);
            return Ok(false);
        };
        let (module, loader) = (entry.module, entry.loader);

        if self.module_state(module) == Some(ModuleState::Unloaded) {
            log::debug!("loading foreign module {}", name);
            self.set_module_state(module, ModuleState::Loading);
            let loaded = self.run_on_new_fiber(|vm| -> VmResult<()> {
                vm.ensure_stack(1)?;
                vm.push(Value::Object(module));
                vm.call_foreign(loader, 1);
                Ok(())
            });
            if let Err(err) = loaded {
                self.set_module_state(module, ModuleState::Unloaded);
                self.push(Value::Null);
                return Err(err);
            }
            self.set_module_state(module, ModuleState::Loaded);
        }

        self.push(Value::Object(module));
        Ok(true)
    }

    /// Push the variables dictionary of the module at `index`, or `Null`.
    pub fn push_module_variables(&mut self, index: isize) {
        self.assert_can_push(1);
        let variables = self
            .get_value(index)
            .as_object()
            .and_then(|m| self.gc().get(m))
            .and_then(HeapObject::as_module)
            .map_or(Value::Null, |module| Value::Object(module.variables));
        self.push(variables);
    }

    /// Drop the registration for `name`, returning its native handle.
    ///
    /// The module object stays alive only while something else references it.
    pub fn unload_foreign_module(&mut self, name: &str) -> Option<NativeHandle> {
        let entry = self.modules.remove(name)?;
        log::debug!("unloaded foreign module {}", name);
        entry.handle
    }

    /// Push the module search path list, creating it on first use.
    pub fn push_module_path(&mut self) -> VmResult<()> {
        self.assert_can_push(1);
        if let Some(path) = self.module_path {
            self.push(Value::Object(path));
            return Ok(());
        }
        match self.alloc(HeapObject::List(ListObj::new())) {
            Ok(path) => {
                self.module_path = Some(path);
                self.push(Value::Object(path));
                Ok(())
            }
            Err(err) => {
                self.push(Value::Null);
                Err(err)
            }
        }
    }

    fn module_state(&self, module: GcRef) -> Option<ModuleState> {
        self.gc().get(module)?.as_module().map(|m| m.state)
    }

    fn set_module_state(&mut self, module: GcRef, state: ModuleState) {
        if let Some(m) = self.state.gc.get_mut(module).and_then(HeapObject::as_module_mut) {
            m.state = state;
        }
    }
}
