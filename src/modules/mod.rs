pub mod catalog;
pub mod users;
pub mod wiki;

use libris_kernel::ModuleRegistry;

/// Register every application module, in mount order.
pub fn register_all(registry: &mut ModuleRegistry) -> anyhow::Result<()> {
    registry.register(catalog::create_module())?;
    registry.register(users::create_module())?;
    registry.register(wiki::create_module())?;
    Ok(())
}
