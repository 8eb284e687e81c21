//! Property-based coverage of the step loop across randomized programs,
//! complementing the fixed scenarios in `scenarios.rs`.

use cpu::Status;
use proptest::prelude::*;
use vm::{VmConfig, VmRegistry};

fn new_registry() -> VmRegistry {
    VmRegistry::new(Box::new(base::LogCrateSink))
}

proptest! {
    /// MOV r16, imm16 always leaves the selected register holding exactly the
    /// immediate that was fetched, whatever register and value are chosen,
    /// and the guest halts cleanly afterward (§8, properties for MOV + HLT).
    #[test]
    fn mov_then_hlt_always_loads_the_chosen_register(reg_bits in 0u8..8, imm16 in any::<u16>()) {
        let mut registry = new_registry();
        let id = registry.create(VmConfig::default()).unwrap();
        {
            let guest = registry.get_mut(id).unwrap();
            let [lo, hi] = imm16.to_le_bytes();
            guest
                .load_bytes(0x1000, &[0xB8 + reg_bits, lo, hi, 0xF4])
                .unwrap();
            guest.reset(0x0000, 0x1000);
        }

        prop_assert_eq!(registry.step(id).unwrap(), Status::Continue);
        prop_assert_eq!(registry.step(id).unwrap(), Status::Halted);

        let cpu_state = registry.get(id).unwrap().cpu();
        prop_assert_eq!(cpu_state.reg16(reg_bits as usize), imm16);
        prop_assert!(cpu_state.halted);
    }

    /// A guest that has halted stays halted under repeated stepping,
    /// regardless of how many extra steps are taken (HALT stickiness, §4.9).
    #[test]
    fn halted_guest_is_sticky_under_repeated_stepping(extra_steps in 0usize..16) {
        let mut registry = new_registry();
        let id = registry.create(VmConfig::default()).unwrap();
        {
            let guest = registry.get_mut(id).unwrap();
            guest.load_bytes(0x1000, &[0xF4]).unwrap();
            guest.reset(0x0000, 0x1000);
        }

        prop_assert_eq!(registry.step(id).unwrap(), Status::Halted);
        for _ in 0..extra_steps {
            prop_assert_eq!(registry.step(id).unwrap(), Status::Halted);
        }
        prop_assert!(registry.get(id).unwrap().cpu().halted);
    }

    /// Two guests created side by side never observe each other's memory,
    /// whatever bytes are written to the shared offset 0 (§7 isolation).
    #[test]
    fn sibling_guests_never_observe_each_others_memory(a_byte in any::<u8>(), b_byte in any::<u8>()) {
        let mut registry = new_registry();
        let a = registry.create(VmConfig::default()).unwrap();
        let b = registry.create(VmConfig::default()).unwrap();

        registry.get_mut(a).unwrap().load_bytes(0, &[a_byte]).unwrap();
        registry.get_mut(b).unwrap().load_bytes(0, &[b_byte]).unwrap();

        prop_assert_eq!(registry.get(a).unwrap().memory().read8(0).unwrap(), a_byte);
        prop_assert_eq!(registry.get(b).unwrap().memory().read8(0).unwrap(), b_byte);
    }
}
