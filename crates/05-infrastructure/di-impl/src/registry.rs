//! bean 注册表

use di_abstractions::BeanDefinition;
use std::collections::HashMap;
use std::sync::Arc;

/// 注入器本地的 bean 注册表
///
/// 同名定义后写覆盖先写，遍历顺序为名称首次注册的顺序。
#[derive(Debug, Default)]
pub struct BeanRegistry {
    definitions: HashMap<String, Arc<BeanDefinition>>,
    order: Vec<String>,
}

impl BeanRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 放入定义，返回被覆盖的旧定义
    pub fn insert(&mut self, definition: BeanDefinition) -> Option<Arc<BeanDefinition>> {
        let name = definition.name().to_string();
        let previous = self.definitions.insert(name.clone(), Arc::new(definition));
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    /// 查找定义
    pub fn get(&self, name: &str) -> Option<&Arc<BeanDefinition>> {
        self.definitions.get(name)
    }

    /// 是否包含定义
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// 按注册顺序遍历 bean 名称
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// 按注册顺序遍历定义
    pub fn definitions(&self) -> impl Iterator<Item = &Arc<BeanDefinition>> {
        self.order.iter().filter_map(|name| self.definitions.get(name))
    }
}
