use tracing::info;

use dwgmap_config::AppConfig;
use dwgmap_core::document::Entity;
use dwgmap_engine::extract::{GeoBatch, extract_geometry};

use crate::errors::FrontendError;
use crate::loader::{DocumentSource, load_document_from_env_or_demo};
use crate::palette::aci_to_rgb;

/// 简易 CLI 演示：加载 DWG 文档（失败则回退到内置演示内容），
/// 按配置的中央子午线提取地理几何并打印概览。
pub fn run_demo(config: &AppConfig) -> Result<(), FrontendError> {
    let loaded = load_document_from_env_or_demo(config);
    let document = &loaded.document;

    let layer_count = document.layers().count();
    let entity_count = document.entities().count();
    info!(layer_count, entity_count, "CLI 演示文档统计");

    println!("dwgmap CLI 演示");
    match &loaded.source {
        DocumentSource::Dwg(path) => {
            println!("已从 DWG 加载文档：{}", path.display());
        }
        DocumentSource::Demo => {
            println!("未指定图纸，使用内置演示内容。");
        }
    }

    println!("当前文档图层：");
    for layer in document.layers() {
        println!("  - {} (可见: {})", layer.name, layer.is_visible);
    }

    println!("当前文档实体：");
    for (id, entity) in document.entities() {
        match entity {
            Entity::Line(line) => {
                println!(
                    "  - 线段 #{}, Layer={}, 颜色={}, 起点=({:.2}, {:.2}), 终点=({:.2}, {:.2})",
                    id.get(),
                    line.layer,
                    line.color,
                    line.start.x(),
                    line.start.y(),
                    line.end.x(),
                    line.end.y()
                );
            }
            Entity::Polyline(polyline) => {
                let coords: Vec<String> = polyline
                    .vertices
                    .iter()
                    .map(|vertex| format!("({:.2}, {:.2})", vertex.x(), vertex.y()))
                    .collect();
                println!(
                    "  - 多段线 #{}, Layer={}, 颜色={}, 顶点数={}, 闭合={}, 顶点={}",
                    id.get(),
                    polyline.layer,
                    polyline.color,
                    polyline.vertices.len(),
                    if polyline.is_closed { "是" } else { "否" },
                    coords.join(" -> ")
                );
            }
            Entity::Circle(circle) => {
                println!(
                    "  - 圆 #{}, Layer={}, 颜色={}, 圆心=({:.2}, {:.2}), 半径={:.2}（不参与提取）",
                    id.get(),
                    circle.layer,
                    circle.color,
                    circle.center.x(),
                    circle.center.y(),
                    circle.radius
                );
            }
            Entity::Arc(arc) => {
                println!(
                    "  - 圆弧 #{}, Layer={}, 颜色={}, 圆心=({:.2}, {:.2}), 半径={:.2}, 角度=[{:.1}°, {:.1}°]（不参与提取）",
                    id.get(),
                    arc.layer,
                    arc.color,
                    arc.center.x(),
                    arc.center.y(),
                    arc.radius,
                    arc.start_angle.to_degrees(),
                    arc.end_angle.to_degrees()
                );
            }
            Entity::Text(text) => {
                println!(
                    "  - 文字 #{}, Layer={}, 颜色={}, 位置=({:.2}, {:.2}), 内容=\"{}\", 高度={:.2}, 旋转={:.1}°",
                    id.get(),
                    text.layer,
                    text.color,
                    text.insert.x(),
                    text.insert.y(),
                    text.content,
                    text.height,
                    text.rotation.to_degrees()
                );
            }
        }
    }

    if let Some(bounds) = document.bounds() {
        println!(
            "图纸范围：北向 [{:.2}, {:.2}], 东向 [{:.2}, {:.2}]",
            bounds.min().x(),
            bounds.max().x(),
            bounds.min().y(),
            bounds.max().y()
        );
    }

    let central_meridian = config.projection.central_meridian;
    println!("中央子午线：{central_meridian}°");
    let batch = extract_geometry(document, central_meridian)?;
    print_batch(&batch);

    Ok(())
}

fn print_batch(batch: &GeoBatch) {
    println!(
        "提取结果：{} 条线段，{} 个文字标注",
        batch.segment_count(),
        batch.label_count()
    );

    for (index, (color, layer)) in batch
        .line_colors
        .iter()
        .zip(batch.line_layers.iter())
        .enumerate()
    {
        let coords = &batch.line_coordinates[index * 4..index * 4 + 4];
        let [r, g, b] = aci_to_rgb(*color);
        println!(
            "  - 线段 {}: ({:.6}, {:.6}) -> ({:.6}, {:.6}), Layer={}, 颜色=ACI {} (#{r:02X}{g:02X}{b:02X})",
            index, coords[0], coords[1], coords[2], coords[3], layer, color
        );
    }

    for (index, (content, layer)) in batch
        .text_contents
        .iter()
        .zip(batch.text_layers.iter())
        .enumerate()
    {
        let coords = &batch.text_coordinates[index * 2..index * 2 + 2];
        println!(
            "  - 文字 {}: ({:.6}, {:.6}), 内容=\"{}\", Layer={}",
            index, coords[0], coords[1], content, layer
        );
    }

    let layers: Vec<&str> = batch.layer_names().into_iter().collect();
    if !layers.is_empty() {
        println!("输出涉及图层：{}", layers.join(", "));
    }

    if let Some(bounds) = batch.bounds() {
        let center = bounds.center();
        println!(
            "地理范围：纬度 [{:.6}, {:.6}], 经度 [{:.6}, {:.6}], 中心 ({:.6}, {:.6})",
            bounds.min().lat,
            bounds.max().lat,
            bounds.min().lon,
            bounds.max().lon,
            center.lat,
            center.lon
        );
    }
}
