pub mod commands {
    pub const RENAME_WHEEL_FILES: &str = "PBU101";
    pub const REMOVE_TARBALLS: &str = "PBU102";
    pub const PYD2WHEEL: &str = "PBU110";
    pub const COLLECT_PYD_MODULES: &str = "PBU201";
    pub const CLEAN_PYD_MODULES: &str = "PBU202";
    pub const COLLECT_DEP_MODULES: &str = "PBU301";
}
