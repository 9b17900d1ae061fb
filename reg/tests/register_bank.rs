use pretty_assertions::assert_eq;
use reg::{
    FieldError, FieldPolicy, ProfileSource, RegError, RegisterBank, RegisterItem, RegisterType,
    Role, TypeSelector,
};

const X86: &str = include_str!("../../profiles/x86-32.regs");
const ARM: &str = include_str!("../../profiles/arm-32.regs");

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn loaded(text: &str) -> RegisterBank {
    init_tracing();
    let mut bank = RegisterBank::new().unwrap();
    bank.load_profile_str(text, FieldPolicy::Lenient).unwrap();
    bank
}

fn names(bank: &RegisterBank, ty: RegisterType) -> Vec<&str> {
    bank.items_of(ty.into())
        .unwrap()
        .iter()
        .map(|item| item.name.as_str())
        .collect()
}

#[test]
fn lookup_by_type_and_all() {
    let bank = loaded("gpr A 4 0\ngpr B 4 4\n");

    let by_type = bank.lookup("A", RegisterType::Gpr.into()).unwrap();
    let by_all = bank.lookup("A", TypeSelector::All).unwrap();
    assert_eq!(by_type, by_all);
    assert!(std::ptr::eq(by_type, by_all));
    assert_eq!(names(&bank, RegisterType::Gpr), vec!["A", "B"]);

    assert_eq!(bank.lookup("A", RegisterType::Fpu.into()), None);
    assert_eq!(bank.lookup("C", TypeSelector::All), None);
}

#[test]
fn all_selector_scans_in_ordinal_order() {
    let bank = loaded("seg x 2 0\ngpr x 4 0\n");
    let found = bank.lookup("x", TypeSelector::All).unwrap();
    assert_eq!(found.ty, RegisterType::Gpr);
}

#[test]
fn byte_and_bit_sizes() {
    let bank = loaded("gpr wide 4 0\ngpr narrow .7 .32\n");
    assert_eq!(
        bank.lookup("wide", TypeSelector::All).map(|item| item.bit_size),
        Some(32)
    );
    assert_eq!(
        bank.lookup("narrow", TypeSelector::All).map(|item| item.bit_size),
        Some(7)
    );
}

#[test]
fn pop_floor() {
    let mut bank = RegisterBank::new().unwrap();
    assert!(matches!(
        bank.pop(),
        Err(RegError::PopUnderflow { .. })
    ));
    assert_eq!(bank.depth(), 1);

    bank.push().unwrap();
    assert!(bank.pop().is_ok());
    assert!(bank.pop().is_err());
    assert_eq!(bank.depth(), 1);
}

#[test]
fn reload_replaces_everything() {
    let mut bank = loaded(X86);
    bank.load_profile_str(ARM, FieldPolicy::Lenient).unwrap();

    assert_eq!(bank.lookup("eax", TypeSelector::All), None);
    assert_eq!(bank.lookup("dr7", TypeSelector::All), None);
    assert!(bank.lookup("r0", TypeSelector::All).is_some());
    assert!(bank.set(RegisterType::Drx).items().is_empty());
    assert!(bank.set(RegisterType::Drx).current().is_empty());
    assert_eq!(bank.role(Role::ProgramCounter), Some("r15"));
}

#[test]
fn rebinding_a_role() {
    let bank = loaded("=pc eip\n=pc rip\n");
    assert_eq!(bank.role(Role::ProgramCounter), Some("rip"));
    assert_eq!(bank.roles().iter().count(), 1);
}

#[test]
fn trailing_comment() {
    let commented = loaded("gpr eax 4 0 # trailing note\ngpr ebx 4 4\n");
    let plain = loaded("gpr eax 4 0\ngpr ebx 4 4\n");
    assert_eq!(
        commented.items().collect::<Vec<_>>(),
        plain.items().collect::<Vec<_>>()
    );
}

#[test]
fn overlong_token_commits_nothing() {
    let mut bank = loaded(X86);
    let text = format!("gpr eax 4 0\ngpr {} 4 4\n", "x".repeat(129));

    assert!(matches!(
        bank.load_profile_str(&text, FieldPolicy::Lenient),
        Err(RegError::TokenTooLong { line: 2, .. })
    ));
    assert_eq!(bank.items().count(), 0);
    assert_eq!(bank.roles().iter().count(), 0);
}

#[test]
fn unknown_type_line_is_skipped() {
    init_tracing();
    let mut bank = RegisterBank::new().unwrap();
    let diagnostics = bank
        .load_profile_str(
            "gpr eax 4 0\nxyz foo 4 4\nflg cf .1 .0\n",
            FieldPolicy::Lenient,
        )
        .unwrap();

    assert_eq!(bank.items().count(), 2);
    assert_eq!(bank.lookup("foo", TypeSelector::All), None);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 2);
    assert_eq!(
        diagnostics[0].error,
        FieldError::UnknownType("xyz".to_string())
    );
}

#[test]
fn strict_load_leaves_bank_reset() {
    let mut bank = loaded(X86);
    assert!(matches!(
        bank.load_profile_str("gpr eax 4 0\nxyz foo 4 4\n", FieldPolicy::Strict),
        Err(RegError::Field(_))
    ));
    assert_eq!(bank.items().count(), 0);
    assert_eq!(bank.role(Role::StackPointer), None);
}

#[test]
fn x86_profile() {
    let bank = loaded(X86);

    assert_eq!(bank.items().count(), 32);
    assert_eq!(
        names(&bank, RegisterType::Seg),
        vec!["cs", "ds", "es", "fs", "gs", "ss"]
    );
    assert_eq!(
        bank.lookup("ah", RegisterType::Gpr.into()),
        Some(&RegisterItem {
            name: "ah".to_string(),
            ty: RegisterType::Gpr,
            bit_size: 8,
            bit_offset: 8,
            packed_bit_size: 0,
        })
    );
    assert_eq!(
        bank.lookup("eflags", TypeSelector::All).map(|item| item.packed_bit_size),
        Some(17)
    );

    assert_eq!(bank.set(RegisterType::Gpr).current().len(), 36);
    assert_eq!(bank.set(RegisterType::Flg).current().len(), 4);
    assert_eq!(bank.set(RegisterType::Seg).current().len(), 12);
    assert_eq!(bank.set(RegisterType::Drx).current().len(), 32);
    assert_eq!(bank.set(RegisterType::Fpu).current().len(), 0);

    let roles: Vec<_> = bank.roles().iter().collect();
    assert_eq!(
        roles,
        vec![
            (Role::ProgramCounter, "eip"),
            (Role::StatusRegister, "eflags"),
            (Role::StackPointer, "esp"),
            (Role::BasePointer, "ebp"),
            (Role::Arg0, "eax"),
            (Role::Arg1, "ebx"),
            (Role::Arg2, "ecx"),
            (Role::Arg3, "edx"),
        ]
    );
}

#[test]
fn display_reparses_to_same_items() {
    let bank = loaded(X86);
    let mut text = String::new();
    for item in bank.items() {
        text.push_str(&item.to_string());
        text.push('\n');
    }

    let again = loaded(&text);
    assert_eq!(
        again.items().collect::<Vec<_>>(),
        bank.items().collect::<Vec<_>>()
    );
}

#[test]
fn step_cycle() {
    let mut bank = loaded(X86);

    for step in 0..3u8 {
        let before = bank.set(RegisterType::Gpr).current().len();
        bank.push().unwrap();
        bank.set_mut(RegisterType::Gpr)
            .current_mut()
            .resize(before)
            .unwrap();
        bank.set_mut(RegisterType::Gpr).current_mut().as_bytes_mut()[0] = step;

        let gpr = bank.set(RegisterType::Gpr);
        assert_eq!(gpr.current().len(), gpr.previous().unwrap().len());

        bank.pop().unwrap();
        assert_eq!(bank.depth(), 1);
    }
}

#[test]
fn load_from_plugin_directory() {
    let source = ProfileSource::with_plugin_root(concat!(env!("CARGO_MANIFEST_DIR"), "/../profiles"));
    let mut bank = RegisterBank::new().unwrap();

    bank.load_profile("arm-32.regs", &source, FieldPolicy::Strict)
        .unwrap();
    assert_eq!(bank.role(Role::StackPointer), Some("r13"));
    assert_eq!(bank.set(RegisterType::Gpr).current().len(), 64);

    assert!(matches!(
        bank.load_profile("mips.regs", &source, FieldPolicy::Lenient),
        Err(RegError::ProfileNotFound { .. })
    ));
    assert!(bank.lookup("r0", TypeSelector::All).is_some());
}
