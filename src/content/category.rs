use serde::{Deserialize, Serialize};

/// 文章分类。
///
/// 简单表示下 `id` 等于 `name`，重命名时 `id` 跟随新名字。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub visible: bool,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            visible: true,
        }
    }

    /// 集合的展示顺序：可见分类在前，组内按名称字典序。
    pub fn sort(categories: &mut [Category]) {
        categories.sort_by(|a, b| {
            b.visible
                .cmp(&a.visible)
                .then_with(|| a.name.cmp(&b.name))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_visible_first_then_by_name() {
        let mut categories = vec![
            Category {
                id: "c".into(),
                name: "c".into(),
                visible: false,
            },
            Category::new("b"),
            Category {
                id: "a".into(),
                name: "a".into(),
                visible: false,
            },
            Category::new("d"),
        ];

        Category::sort(&mut categories);

        let order: Vec<(&str, bool)> = categories
            .iter()
            .map(|c| (c.name.as_str(), c.visible))
            .collect();
        assert_eq!(order, vec![("b", true), ("d", true), ("a", false), ("c", false)]);
    }
}
