pub mod errors {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("central meridian must be finite, got {0}")]
        NonFiniteMeridian(f64),
    }
}

pub mod extract {
    //! 提取器：遍历图纸文档，把每个可渲染实体反算为 WGS84 几何，
    //! 并按平行序列累积输出。

    use std::collections::BTreeSet;

    use serde::Serialize;
    use tracing::{debug, trace};

    use dwgmap_core::document::{Document, Entity};
    use dwgmap_core::geometry::Point2;
    use dwgmap_core::projection::{self, GeoBounds, GeoPoint};

    use crate::errors::EngineError;

    /// 一次提取的全部地理几何，以平行序列组织，便于跨边界编组。
    ///
    /// 序列间的对齐关系是本结构的硬性契约：
    /// `line_coordinates` 长度恒为 `line_colors` 的 4 倍（每段一个
    /// (lat1, lon1, lat2, lon2) 四元组），`text_coordinates` 长度恒为
    /// `text_contents` 的 2 倍；任何编组适配器都必须原样保持该关系。
    #[derive(Debug, Clone, Default, Serialize)]
    pub struct GeoBatch {
        pub line_coordinates: Vec<f64>,
        pub line_colors: Vec<i32>,
        pub line_layers: Vec<String>,
        pub text_coordinates: Vec<f64>,
        pub text_contents: Vec<String>,
        pub text_layers: Vec<String>,
    }

    impl GeoBatch {
        /// 已累积的线段数量。
        #[inline]
        pub fn segment_count(&self) -> usize {
            self.line_colors.len()
        }

        /// 已累积的文字标注数量。
        #[inline]
        pub fn label_count(&self) -> usize {
            self.text_contents.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.line_colors.is_empty() && self.text_contents.is_empty()
        }

        /// 校验平行序列对齐关系。按构造不可能违反；一旦违反属于编程
        /// 错误，在调试构建中直接断言，而非可恢复的运行期错误。
        pub fn is_aligned(&self) -> bool {
            self.line_coordinates.len() == self.line_colors.len() * 4
                && self.line_layers.len() == self.line_colors.len()
                && self.text_coordinates.len() == self.text_contents.len() * 2
                && self.text_layers.len() == self.text_contents.len()
        }

        /// 全部坐标的经纬度范围，空批次返回 `None`。
        pub fn bounds(&self) -> Option<GeoBounds> {
            let mut bounds = GeoBounds::empty();
            for pair in self.line_coordinates.chunks_exact(2) {
                bounds.include(GeoPoint::new(pair[0], pair[1]));
            }
            for pair in self.text_coordinates.chunks_exact(2) {
                bounds.include(GeoPoint::new(pair[0], pair[1]));
            }
            if bounds.is_empty() { None } else { Some(bounds) }
        }

        /// 输出中出现过的图层名（去重、有序），供图层管理界面使用。
        pub fn layer_names(&self) -> BTreeSet<&str> {
            self.line_layers
                .iter()
                .chain(self.text_layers.iter())
                .map(String::as_str)
                .collect()
        }

        fn push_segment(&mut self, start: GeoPoint, end: GeoPoint, color: i32, layer: &str) {
            self.line_coordinates
                .extend_from_slice(&[start.lat, start.lon, end.lat, end.lon]);
            self.line_colors.push(color);
            self.line_layers.push(layer.to_string());
        }

        fn push_label(&mut self, position: GeoPoint, content: &str, layer: &str) {
            self.text_coordinates
                .extend_from_slice(&[position.lat, position.lon]);
            self.text_contents.push(content.to_string());
            self.text_layers.push(layer.to_string());
        }
    }

    /// 单趟遍历文档实体并投影为地理几何。实体顺序即输出顺序，
    /// 后续渲染的叠放次序依赖这一点。
    pub fn extract_geometry(
        document: &Document,
        central_meridian_deg: f64,
    ) -> Result<GeoBatch, EngineError> {
        if !central_meridian_deg.is_finite() {
            return Err(EngineError::NonFiniteMeridian(central_meridian_deg));
        }

        let mut batch = GeoBatch::default();
        for (id, entity) in document.entities() {
            match entity {
                Entity::Line(line) => {
                    let start = project_vertex(line.start, central_meridian_deg);
                    let end = project_vertex(line.end, central_meridian_deg);
                    batch.push_segment(start, end, line.color, &line.layer);
                }
                Entity::Polyline(polyline) => {
                    // N 个顶点产生 N-1 段；0 或 1 个顶点不产生输出，也不报错。
                    for pair in polyline.vertices.windows(2) {
                        let start = project_vertex(pair[0], central_meridian_deg);
                        let end = project_vertex(pair[1], central_meridian_deg);
                        batch.push_segment(start, end, polyline.color, &polyline.layer);
                    }
                }
                Entity::Text(text) => {
                    let position = project_vertex(text.insert, central_meridian_deg);
                    batch.push_label(position, &text.content, &text.layer);
                }
                other => {
                    // 不参与地理提取的实体类型一律跳过，保证遍历不中断。
                    trace!(id = id.get(), kind = other.kind_name(), "跳过不提取的实体类型");
                }
            }
        }

        debug_assert!(batch.is_aligned());
        debug!(
            segments = batch.segment_count(),
            labels = batch.label_count(),
            central_meridian_deg,
            "几何提取完成"
        );
        Ok(batch)
    }

    /// 图纸点存储约定为 x=北向、y=东向，而投影函数按（东向，北向）
    /// 取参，调用处必须交换两轴。
    #[inline]
    fn project_vertex(point: Point2, central_meridian_deg: f64) -> GeoPoint {
        projection::tm_to_wgs84(point.y(), point.x(), central_meridian_deg)
    }

}
