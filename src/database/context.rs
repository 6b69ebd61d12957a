/// Tenant database name for the request currently being handled.
///
/// One value is built per request by the auth middleware (from the token's
/// databaseName claim) and carried through the request's extensions, so
/// concurrent requests can never observe each other's tenant. The pool
/// registry reads it when no explicit database name is given.
#[derive(Debug, Clone, Default)]
pub struct TenantContext {
    database: Option<String>,
}

impl TenantContext {
    /// Context with no tenant set; resolution falls back to the default
    /// tenant database.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_database(database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
        }
    }

    pub fn set_database(&mut self, database: impl Into<String>) {
        self.database = Some(database.into());
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn clear_database(&mut self) {
        self.database = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset() {
        assert_eq!(TenantContext::new().database(), None);
    }

    #[test]
    fn set_get_clear() {
        let mut ctx = TenantContext::new();
        ctx.set_database("hoa_nexus_oakridge");
        assert_eq!(ctx.database(), Some("hoa_nexus_oakridge"));

        ctx.set_database("hoa_nexus_lakeview");
        assert_eq!(ctx.database(), Some("hoa_nexus_lakeview"));

        ctx.clear_database();
        assert_eq!(ctx.database(), None);
    }

    #[test]
    fn contexts_are_independent() {
        let mut a = TenantContext::for_database("hoa_nexus_org_a");
        let b = a.clone();
        a.set_database("hoa_nexus_org_b");

        assert_eq!(a.database(), Some("hoa_nexus_org_b"));
        assert_eq!(b.database(), Some("hoa_nexus_org_a"));
    }
}
