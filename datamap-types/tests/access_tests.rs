use datamap_types::Access;

#[test]
fn read_write_contains_both() {
    assert!(Access::READ_WRITE.contains(Access::READ));
    assert!(Access::READ_WRITE.contains(Access::WRITE));
    assert_eq!(Access::READ | Access::WRITE, Access::READ_WRITE);
}

#[test]
fn single_flags_are_disjoint() {
    assert!(!Access::READ.contains(Access::WRITE));
    assert!(!Access::WRITE.intersects(Access::READ));
    assert!((Access::READ & Access::WRITE).is_empty());
}

#[test]
fn none_is_empty() {
    assert!(Access::NONE.is_empty());
    assert_eq!(Access::default(), Access::NONE);
    assert!(Access::READ.contains(Access::NONE));
}

#[test]
fn from_bits_truncates_unknown() {
    assert_eq!(Access::from_bits_truncate(0xFF), Access::READ_WRITE);
    assert_eq!(Access::from_bits_truncate(0b01).bits(), 1);
}

#[test]
fn serde_as_name_list() {
    let json = serde_json::to_string(&Access::READ_WRITE).unwrap();
    assert_eq!(json, r#"["read","write"]"#);
    let parsed: Access = serde_json::from_str(r#"["WRITE"]"#).unwrap();
    assert_eq!(parsed, Access::WRITE);
    let empty: Access = serde_json::from_str("[]").unwrap();
    assert!(empty.is_empty());
}

#[test]
fn serde_rejects_unknown_flag() {
    assert!(serde_json::from_str::<Access>(r#"["execute"]"#).is_err());
}

#[test]
fn debug_lists_flags() {
    assert_eq!(format!("{:?}", Access::READ_WRITE), "Access(read|write)");
}
