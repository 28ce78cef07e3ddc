//! Built-in item-kind table.
//!
//! Numeric ids follow the classic item numbering so that persisted documents
//! written with numeric keys (`"276"`) keep resolving.

/// `(id, NAME)` pairs for the standard catalog. Names are matched
/// case-insensitively with separators ignored.
pub const STANDARD_KINDS: &[(u16, &str)] = &[
    (0, "AIR"),
    (1, "STONE"),
    (2, "GRASS"),
    (3, "DIRT"),
    (4, "COBBLESTONE"),
    (5, "WOOD"),
    (6, "SAPLING"),
    (7, "BEDROCK"),
    (12, "SAND"),
    (13, "GRAVEL"),
    (14, "GOLD_ORE"),
    (15, "IRON_ORE"),
    (16, "COAL_ORE"),
    (17, "LOG"),
    (18, "LEAVES"),
    (20, "GLASS"),
    (24, "SANDSTONE"),
    (31, "LONG_GRASS"),
    (35, "WOOL"),
    (37, "YELLOW_FLOWER"),
    (38, "RED_ROSE"),
    (41, "GOLD_BLOCK"),
    (42, "IRON_BLOCK"),
    (45, "BRICK"),
    (46, "TNT"),
    (47, "BOOKSHELF"),
    (49, "OBSIDIAN"),
    (50, "TORCH"),
    (54, "CHEST"),
    (57, "DIAMOND_BLOCK"),
    (58, "WORKBENCH"),
    (61, "FURNACE"),
    (65, "LADDER"),
    (79, "ICE"),
    (80, "SNOW_BLOCK"),
    (81, "CACTUS"),
    (82, "CLAY"),
    (86, "PUMPKIN"),
    (87, "NETHERRACK"),
    (89, "GLOWSTONE"),
    (256, "IRON_SPADE"),
    (257, "IRON_PICKAXE"),
    (258, "IRON_AXE"),
    (259, "FLINT_AND_STEEL"),
    (260, "APPLE"),
    (261, "BOW"),
    (262, "ARROW"),
    (263, "COAL"),
    (264, "DIAMOND"),
    (265, "IRON_INGOT"),
    (266, "GOLD_INGOT"),
    (267, "IRON_SWORD"),
    (268, "WOOD_SWORD"),
    (269, "WOOD_SPADE"),
    (270, "WOOD_PICKAXE"),
    (271, "WOOD_AXE"),
    (272, "STONE_SWORD"),
    (273, "STONE_SPADE"),
    (274, "STONE_PICKAXE"),
    (275, "STONE_AXE"),
    (276, "DIAMOND_SWORD"),
    (277, "DIAMOND_SPADE"),
    (278, "DIAMOND_PICKAXE"),
    (279, "DIAMOND_AXE"),
    (280, "STICK"),
    (281, "BOWL"),
    (283, "GOLD_SWORD"),
    (284, "GOLD_SPADE"),
    (285, "GOLD_PICKAXE"),
    (286, "GOLD_AXE"),
    (287, "STRING"),
    (288, "FEATHER"),
    (289, "SULPHUR"),
    (290, "WOOD_HOE"),
    (291, "STONE_HOE"),
    (292, "IRON_HOE"),
    (293, "DIAMOND_HOE"),
    (294, "GOLD_HOE"),
    (295, "SEEDS"),
    (296, "WHEAT"),
    (297, "BREAD"),
    (318, "FLINT"),
    (319, "PORK"),
    (320, "GRILLED_PORK"),
    (322, "GOLDEN_APPLE"),
    (323, "SIGN"),
    (325, "BUCKET"),
    (326, "WATER_BUCKET"),
    (327, "LAVA_BUCKET"),
    (331, "REDSTONE"),
    (332, "SNOW_BALL"),
    (334, "LEATHER"),
    (336, "CLAY_BRICK"),
    (337, "CLAY_BALL"),
    (339, "PAPER"),
    (340, "BOOK"),
    (341, "SLIME_BALL"),
    (344, "EGG"),
    (345, "COMPASS"),
    (346, "FISHING_ROD"),
    (347, "WATCH"),
    (348, "GLOWSTONE_DUST"),
    (351, "INK_SACK"),
    (352, "BONE"),
    (353, "SUGAR"),
    (357, "COOKIE"),
    (358, "MAP"),
    (359, "SHEARS"),
    (369, "BLAZE_ROD"),
    (381, "EYE_OF_ENDER"),
    (385, "FIREBALL"),
    (388, "EMERALD"),
    (399, "NETHER_STAR"),
];
