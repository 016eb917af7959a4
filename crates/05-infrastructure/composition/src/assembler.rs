//! 注册配方组装

use crate::packer::RegistrationDescriptor;
use di_abstractions::{ComponentRegistry, Registration};
use infrastructure_common::{to_camel_case, DependencyResult, Lifetime, NamedSlots};
use tracing::{debug, info};

/// 把打包得到的描述折叠为按名称索引的注册配方
#[derive(Debug, Clone, Copy)]
pub struct RegistrationAssembler {
    default_lifetime: Lifetime,
}

impl RegistrationAssembler {
    pub fn new(default_lifetime: Lifetime) -> Self {
        Self { default_lifetime }
    }

    pub fn default_lifetime(&self) -> Lifetime {
        self.default_lifetime
    }

    /// 按遍历顺序组装，同名描述后写覆盖先写
    pub fn assemble(&self, descriptors: Vec<RegistrationDescriptor>) -> NamedSlots<Registration> {
        self.assemble_into(NamedSlots::new(), descriptors)
    }

    /// 在已有配方之上继续组装
    pub fn assemble_into(
        &self,
        mut registrations: NamedSlots<Registration>,
        descriptors: Vec<RegistrationDescriptor>,
    ) -> NamedSlots<Registration> {
        for descriptor in descriptors {
            let name = to_camel_case(&descriptor.name);
            let lifetime = descriptor.lifetime_or(self.default_lifetime);
            let registration = Registration::new(descriptor.kind, lifetime, descriptor.payload);

            if registrations.insert(name.as_str(), registration).is_some() {
                debug!("同名组件被覆盖: {}", name);
            }
        }
        registrations
    }

    /// 交给注册表批量注册
    pub fn register<R: ComponentRegistry + ?Sized>(
        &self,
        registry: &R,
        registrations: NamedSlots<Registration>,
    ) -> DependencyResult<usize> {
        let count = registrations.len();
        let registered = registry.register_bulk(registrations)?;
        info!("组装了 {} 个注册配方，注册了 {} 个", count, registered);
        Ok(registered)
    }
}

impl Default for RegistrationAssembler {
    fn default() -> Self {
        Self::new(Lifetime::Singleton)
    }
}
