use crate::entity::Feature;

/// Data feature for a finite resource node: what it yields, how much is
/// left, and where it sits in tile coordinates.
pub struct ExtractableModel {
    resource: String,
    quantity: u32,
    tx: i32,
    ty: i32,
    width_in_tiles: u32,
    height_in_tiles: u32,
}

impl ExtractableModel {
    #[must_use]
    pub fn new(resource: impl Into<String>, quantity: u32) -> ExtractableModel {
        ExtractableModel {
            resource: resource.into(),
            quantity,
            tx: 0,
            ty: 0,
            width_in_tiles: 1,
            height_in_tiles: 1,
        }
    }

    /// Places the node on the tile grid.
    ///
    /// # Panics
    ///
    /// Panics if either tile dimension is zero.
    pub fn set_location(&mut self, tx: i32, ty: i32, width_in_tiles: u32, height_in_tiles: u32) {
        assert!(
            width_in_tiles > 0 && height_in_tiles > 0,
            "invalid extractable size"
        );
        self.tx = tx;
        self.ty = ty;
        self.width_in_tiles = width_in_tiles;
        self.height_in_tiles = height_in_tiles;
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Removes up to `amount` from the node and returns how much was
    /// actually taken.
    pub fn extract_resource(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.quantity);
        self.quantity -= taken;
        taken
    }

    #[must_use]
    pub fn tx(&self) -> i32 {
        self.tx
    }

    #[must_use]
    pub fn ty(&self) -> i32 {
        self.ty
    }

    #[must_use]
    pub fn width_in_tiles(&self) -> u32 {
        self.width_in_tiles
    }

    #[must_use]
    pub fn height_in_tiles(&self) -> u32 {
        self.height_in_tiles
    }
}

impl Feature for ExtractableModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_is_bounded_by_remaining_quantity() {
        let mut node = ExtractableModel::new("gold", 10);
        assert_eq!(node.extract_resource(4), 4);
        assert_eq!(node.extract_resource(8), 6);
        assert_eq!(node.extract_resource(8), 0);
        assert_eq!(node.quantity(), 0);
    }

    #[test]
    #[should_panic(expected = "invalid extractable size")]
    fn zero_sized_location_is_rejected() {
        let mut node = ExtractableModel::new("gold", 1);
        node.set_location(0, 0, 0, 1);
    }
}
