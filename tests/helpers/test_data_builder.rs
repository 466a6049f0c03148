// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use tower_breakdown::domain::InventoryItem;

// ==========================================
// InventoryItem 构建器
// ==========================================

pub struct InventoryItemBuilder {
    item: InventoryItem,
}

impl InventoryItemBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            item: InventoryItem {
                id: id.to_string(),
                description: format!("Pieza {}", id),
                item_type: "S2".to_string(),
                manufacturer: "ACME".to_string(),
                head: "C1".to_string(),
                ..Default::default()
            },
        }
    }

    pub fn tower_type(mut self, value: &str) -> Self {
        self.item.item_type = value.to_string();
        self
    }

    pub fn manufacturer(mut self, value: &str) -> Self {
        self.item.manufacturer = value.to_string();
        self
    }

    pub fn head(mut self, value: &str) -> Self {
        self.item.head = value.to_string();
        self
    }

    pub fn division(mut self, value: &str) -> Self {
        self.item.division = value.to_string();
        self
    }

    pub fn body(mut self, value: &str) -> Self {
        self.item.body = value.to_string();
        self
    }

    pub fn section(mut self, value: &str) -> Self {
        self.item.section = value.to_string();
        self
    }

    pub fn position(mut self, value: &str) -> Self {
        self.item.position = value.to_string();
        self
    }

    pub fn quantity(mut self, value: f64) -> Self {
        self.item.quantity_per_tower = value;
        self
    }

    pub fn weight(mut self, value: f64) -> Self {
        self.item.unit_weight = value;
        self
    }

    pub fn build(self) -> InventoryItem {
        self.item
    }
}

// ==========================================
// 标准测试目录
// ==========================================

/// 覆盖二分 / 四分 / 普通分部以及第二种塔型的小目录
pub fn sample_catalog() -> Vec<InventoryItem> {
    vec![
        InventoryItemBuilder::new("P-001")
            .division("BSUP")
            .body("CU1")
            .section("A1")
            .quantity(4.0)
            .weight(2.5)
            .build(),
        InventoryItemBuilder::new("P-002")
            .division("PATA 3")
            .body("CU1")
            .section("B2")
            .quantity(10.0)
            .weight(1.0)
            .build(),
        InventoryItemBuilder::new("P-003")
            .division("PATA 3")
            .body("CU2")
            .section("B2")
            .quantity(1.0)
            .weight(3.0)
            .build(),
        InventoryItemBuilder::new("P-004")
            .division("TORNILLO")
            .body("CU2")
            .section("a1")
            .quantity(8.0)
            .weight(0.5)
            .build(),
        InventoryItemBuilder::new("P-005")
            .tower_type("A1")
            .division("BSUP")
            .section("C3")
            .quantity(6.0)
            .weight(1.0)
            .build(),
    ]
}
