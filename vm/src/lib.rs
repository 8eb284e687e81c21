//! Owns guest memory and CPU state together, and multiplexes several
//! isolated guests behind a fixed-capacity registry (§3, §7).
//!
//! This is the layer the excluded interactive shell/driver talks to: it
//! never parses a command line or a boot image itself, only exposes
//! `create`/`destroy`/`step`/`reset`/`load_bytes` as narrow entry points.

mod trace;

use cpu::CpuState;
use mem::Memory;

/// Fixed number of guest slots the registry holds open at once (§7). A
/// fixed cap, rather than an unbounded `Vec`, keeps one runaway host from
/// growing memory without limit just by creating VMs.
pub const MAX_VMS: usize = 8;

#[derive(Debug, Clone)]
pub struct VmConfig {
    pub ram_bytes: usize,
    pub trace_enabled: bool,
    /// Display name for the guest (§3, §4.10). Defaults to `vm<id>` when
    /// absent, the same fallback `vm_create_default` uses for a null/empty
    /// name.
    pub name: Option<String>,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            ram_bytes: mem::MIN_RAM_BYTES,
            trace_enabled: false,
            name: None,
        }
    }
}

/// One guest: its CPU state and its own memory, stepped independently of
/// every other guest in the registry.
pub struct Vm {
    cpu: CpuState,
    mem: Memory,
    trace_enabled: bool,
    name: String,
}

impl Vm {
    fn new(id: usize, config: &VmConfig) -> base::Result<Self> {
        if config.ram_bytes < mem::MIN_RAM_BYTES {
            return Err(base::Error::RamTooSmall {
                requested: config.ram_bytes,
                minimum: mem::MIN_RAM_BYTES,
            });
        }
        let name = match &config.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("vm{id}"),
        };
        Ok(Vm {
            cpu: CpuState::reset(),
            mem: Memory::new(config.ram_bytes),
            trace_enabled: config.trace_enabled,
            name,
        })
    }

    pub fn cpu(&self) -> &CpuState {
        &self.cpu
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mutable access to register/flag state, for a host seeding registers
    /// before a run or inspecting them afterward.
    pub fn cpu_mut(&mut self) -> &mut CpuState {
        &mut self.cpu
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    /// Re-arms the guest to power-on defaults and redirects CS:IP to the
    /// host-supplied entry point (§4.6). Does not touch guest memory —
    /// callers that want a clean slate call `load_bytes` themselves.
    pub fn reset(&mut self, cs: u16, ip: u16) {
        self.cpu = CpuState::reset();
        self.cpu.set_seg(cpu::CS, cs);
        self.cpu.ip = ip;
    }

    pub fn load_bytes(&mut self, addr: u32, data: &[u8]) -> mem::Result<()> {
        self.mem.load_bytes(addr, data)
    }

    /// Runs one instruction, emitting trace lines around decode and execute
    /// when tracing is enabled for this guest and the sink's level gate
    /// permits it (§4.11).
    fn step(&mut self, log: &dyn base::LogSink) -> cpu::Status {
        if self.cpu.halted {
            return cpu::Status::Halted;
        }

        self.cpu.begin_instruction();

        let tracing = self.trace_enabled && log.enabled(base::Level::Trace);
        if tracing {
            let window = self.mem.window(cpu::linear(self.cpu.seg(cpu::CS), self.cpu.ip), 16);
            log.emit(
                base::Level::Trace,
                "cpu",
                &format!(
                    "pre bytes=[{}] {}",
                    trace::hex_window(window),
                    trace::register_dump(&self.cpu)
                ),
            );
        }

        if let Err(fault) = cpu::drain_prefixes(&mut self.cpu, &self.mem) {
            return cpu::Status::Faulted(fault);
        }

        let handler = match cpu::decode(&mut self.cpu, &self.mem) {
            Ok(handler) => handler,
            Err(cpu::DecodeError::Fault(fault)) => return cpu::Status::Faulted(fault),
            Err(cpu::DecodeError::InvalidOpcode(opcode)) => {
                return cpu::Status::InvalidOpcode { opcode }
            }
        };

        if tracing {
            log.emit(base::Level::Trace, "cpu", &format!("decode {}", trace::describe(&handler)));
        }

        let mut ctx = cpu::ExecContext::new(&mut self.cpu, &mut self.mem);
        let status = cpu::execute(&mut ctx, handler);

        if tracing {
            log.emit(
                base::Level::Trace,
                "cpu",
                &format!("post status={status:?} {}", trace::register_dump(&self.cpu)),
            );
        }

        status
    }
}

/// A fixed-capacity table of live guests, each addressed by its slot index,
/// plus a "current VM" pointer (§3, §4.10) for host drivers that operate on
/// one guest at a time rather than always naming an id explicitly.
pub struct VmRegistry {
    slots: Vec<Option<Vm>>,
    current: Option<usize>,
    log: Box<dyn base::LogSink>,
}

impl VmRegistry {
    pub fn new(log: Box<dyn base::LogSink>) -> Self {
        let mut slots = Vec::with_capacity(MAX_VMS);
        slots.resize_with(MAX_VMS, || None);
        VmRegistry { slots, current: None, log }
    }

    /// Allocates the lowest free slot for a new guest and makes it current.
    pub fn create(&mut self, config: VmConfig) -> base::Result<usize> {
        let slot = self
            .slots
            .iter()
            .position(|s| s.is_none())
            .ok_or(base::Error::SlotsExhausted { capacity: MAX_VMS })?;
        let vm = Vm::new(slot, &config)?;
        self.slots[slot] = Some(vm);
        self.current = Some(slot);
        Ok(slot)
    }

    /// Releases a guest's RAM and clears its slot. Clears `current` if it
    /// pointed at this id (§3 invariant 5: current is always −1 or in-use).
    pub fn destroy(&mut self, id: usize) -> base::Result<()> {
        let slot = self
            .slots
            .get_mut(id)
            .filter(|s| s.is_some())
            .ok_or(base::Error::UnknownVm { id })?;
        *slot = None;
        if self.current == Some(id) {
            self.current = None;
        }
        Ok(())
    }

    /// Points `current` at an existing, in-use guest (§4.10 `use(id)`).
    pub fn select(&mut self, id: usize) -> base::Result<()> {
        if !matches!(self.slots.get(id), Some(Some(_))) {
            return Err(base::Error::UnknownVm { id });
        }
        self.current = Some(id);
        Ok(())
    }

    /// The id the registry currently points at, if any.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn get(&self, id: usize) -> base::Result<&Vm> {
        self.slots
            .get(id)
            .and_then(|s| s.as_ref())
            .ok_or(base::Error::UnknownVm { id })
    }

    pub fn get_mut(&mut self, id: usize) -> base::Result<&mut Vm> {
        self.slots
            .get_mut(id)
            .and_then(|s| s.as_mut())
            .ok_or(base::Error::UnknownVm { id })
    }

    /// The display name of a guest, `vm<id>` unless overridden at creation
    /// (§4.10 `vm_list`'s per-entry name column).
    pub fn name(&self, id: usize) -> base::Result<&str> {
        self.get(id).map(Vm::name)
    }

    pub fn list(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.is_some().then_some(i))
            .collect()
    }

    pub fn step(&mut self, id: usize) -> base::Result<cpu::Status> {
        let log = self.log.as_ref();
        let vm = self
            .slots
            .get_mut(id)
            .and_then(|s| s.as_mut())
            .ok_or(base::Error::UnknownVm { id })?;
        Ok(vm.step(log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_ram_below_the_minimum() {
        let mut registry = VmRegistry::new(Box::new(base::LogCrateSink));
        let result = registry.create(VmConfig {
            ram_bytes: 16,
            trace_enabled: false,
            name: None,
        });
        assert_eq!(
            result,
            Err(base::Error::RamTooSmall {
                requested: 16,
                minimum: mem::MIN_RAM_BYTES
            })
        );
    }

    #[test]
    fn registry_enforces_its_slot_capacity() {
        let mut registry = VmRegistry::new(Box::new(base::LogCrateSink));
        for _ in 0..MAX_VMS {
            registry.create(VmConfig::default()).unwrap();
        }
        assert_eq!(
            registry.create(VmConfig::default()),
            Err(base::Error::SlotsExhausted { capacity: MAX_VMS })
        );
    }

    #[test]
    fn destroyed_slots_are_reusable_and_isolated_from_other_guests() {
        let mut registry = VmRegistry::new(Box::new(base::LogCrateSink));
        let a = registry.create(VmConfig::default()).unwrap();
        let b = registry.create(VmConfig::default()).unwrap();

        registry.get_mut(a).unwrap().load_bytes(0, &[0xAA]).unwrap();
        registry.get_mut(b).unwrap().load_bytes(0, &[0xBB]).unwrap();
        assert_ne!(
            registry.get(a).unwrap().memory().read8(0),
            registry.get(b).unwrap().memory().read8(0)
        );

        registry.destroy(a).unwrap();
        assert!(registry.get(a).is_err());
        let reused = registry.create(VmConfig::default()).unwrap();
        assert_eq!(reused, a);
    }

    #[test]
    fn unnamed_guests_default_to_vm_plus_their_id() {
        let mut registry = VmRegistry::new(Box::new(base::LogCrateSink));
        let a = registry.create(VmConfig::default()).unwrap();
        let b = registry.create(VmConfig::default()).unwrap();
        assert_eq!(registry.name(a).unwrap(), format!("vm{a}"));
        assert_eq!(registry.name(b).unwrap(), format!("vm{b}"));
    }

    #[test]
    fn a_requested_name_overrides_the_default() {
        let mut registry = VmRegistry::new(Box::new(base::LogCrateSink));
        let id = registry
            .create(VmConfig {
                name: Some("bootstrap".to_string()),
                ..VmConfig::default()
            })
            .unwrap();
        assert_eq!(registry.name(id).unwrap(), "bootstrap");
    }

    #[test]
    fn creating_a_guest_makes_it_current() {
        let mut registry = VmRegistry::new(Box::new(base::LogCrateSink));
        assert_eq!(registry.current(), None);
        let a = registry.create(VmConfig::default()).unwrap();
        assert_eq!(registry.current(), Some(a));
        let b = registry.create(VmConfig::default()).unwrap();
        assert_eq!(registry.current(), Some(b));
    }

    #[test]
    fn destroying_the_current_guest_clears_current() {
        let mut registry = VmRegistry::new(Box::new(base::LogCrateSink));
        let a = registry.create(VmConfig::default()).unwrap();
        let b = registry.create(VmConfig::default()).unwrap();
        registry.select(a).unwrap();

        registry.destroy(b).unwrap();
        assert_eq!(registry.current(), Some(a));

        registry.destroy(a).unwrap();
        assert_eq!(registry.current(), None);
    }

    #[test]
    fn select_rejects_unknown_or_destroyed_ids() {
        let mut registry = VmRegistry::new(Box::new(base::LogCrateSink));
        assert_eq!(registry.select(0), Err(base::Error::UnknownVm { id: 0 }));
        let a = registry.create(VmConfig::default()).unwrap();
        registry.destroy(a).unwrap();
        assert_eq!(registry.select(a), Err(base::Error::UnknownVm { id: a }));
    }

    #[test]
    fn step_on_unknown_vm_id_reports_an_error() {
        let mut registry = VmRegistry::new(Box::new(base::LogCrateSink));
        assert_eq!(registry.step(3), Err(base::Error::UnknownVm { id: 3 }));
    }
}
