use enumset::EnumSet;

use crate::qualifier::qualifiers_to_string;
use crate::*;

#[test]
fn test_function_qualifier_sets() {
    assert_eq!(qualifiers_to_string(EnumSet::<FunctionQualifier>::empty()), "");
    assert_eq!(qualifiers_to_string(EnumSet::only(FunctionQualifier::Kernel)), "kernel");
    assert_eq!(qualifiers_to_string(FunctionQualifier::Extern | FunctionQualifier::Inline), "extern inline");
    assert_eq!(qualifiers_to_string(FunctionQualifier::Inline | FunctionQualifier::Kernel), "inline kernel");
    assert_eq!(qualifiers_to_string(EnumSet::<FunctionQualifier>::all()), "extern inline kernel");
}

#[test]
fn test_type_qualifier_sets() {
    assert_eq!(qualifiers_to_string(EnumSet::only(TypeQualifier::Restrict)), "restrict");
    assert_eq!(qualifiers_to_string(TypeQualifier::Const | TypeQualifier::Volatile), "const volatile");
}

#[test]
fn test_constant_spellings() {
    assert_eq!(MemFenceFlag::Local.as_str(), "CLK_LOCAL_MEM_FENCE");
    assert_eq!(MemoryScope::AllSvmDevices.as_str(), "memory_scope_all_svm_devices");
    assert_eq!(MemoryOrder::AcqRel.as_str(), "memory_order_acq_rel");
    assert_eq!(Endianness::Host.as_str(), "host");
}
