//! AutoCAD 颜色索引（ACI）到 RGB 的基础映射。
//!
//! 完整的 ACI 调色板有 256 项；测绘图纸实际只使用标准的 1-7 号，
//! 其余索引统一回退为浅灰。

/// 将 ACI 颜色索引解析为 RGB。
pub fn aci_to_rgb(aci: i32) -> [u8; 3] {
    match aci {
        1 => [255, 0, 0],     // 红
        2 => [255, 255, 0],   // 黄
        3 => [0, 255, 0],     // 绿
        4 => [0, 255, 255],   // 青
        5 => [0, 0, 255],     // 蓝
        6 => [255, 0, 255],   // 品红
        7 => [255, 255, 255], // 白
        _ => [200, 200, 200], // 浅灰回退
    }
}
