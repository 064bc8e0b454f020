pub mod geometry {
    use glam::DVec2;
    use serde::{Deserialize, Serialize};

    /// 二维图纸坐标点，内部以 `glam::DVec2` 表示，保持双精度。
    /// 图纸空间约定 x 为北向（northing）、y 为东向（easting），单位为米。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 轴对齐边界框，用于估算文档/实体在图纸空间中的范围。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        #[inline]
        pub fn new(min: Point2, max: Point2) -> Self {
            Self { min, max }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            let min_vec = self.min.as_vec2().min(point.as_vec2());
            let max_vec = self.max.as_vec2().max(point.as_vec2());
            self.min = Point2::from_vec(min_vec);
            self.max = Point2::from_vec(max_vec);
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            let min_vec = self.min.as_vec2();
            let max_vec = self.max.as_vec2();
            let center = (min_vec + max_vec) * 0.5;
            Point2::from_vec(center)
        }
    }
}

pub mod projection {
    //! Gauss-Kruger（横轴墨卡托）逆投影。
    //!
    //! 采用 Snyder 闭式级数，无迭代；在距中央子午线数度范围内精度满足
    //! 亚米级东向坐标的反算需求，远离中央子午线或接近两极时精度下降，
    //! 属于已知近似而非错误。

    use serde::{Deserialize, Serialize};

    /// WGS84 地理坐标，十进制度。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct GeoPoint {
        pub lat: f64,
        pub lon: f64,
    }

    impl GeoPoint {
        #[inline]
        pub fn new(lat: f64, lon: f64) -> Self {
            Self { lat, lon }
        }
    }

    // GRS80/WGS84 椭球参数。
    const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
    const FLATTENING: f64 = 1.0 / 298.257_223_563;
    const SEMI_MINOR_AXIS: f64 = SEMI_MAJOR_AXIS * (1.0 - FLATTENING);
    /// 第一偏心率平方 e²。
    const ECC_SQ: f64 = (SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS - SEMI_MINOR_AXIS * SEMI_MINOR_AXIS)
        / (SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS);
    /// 第二偏心率平方 e'²。
    const ECC_PRIME_SQ: f64 = (SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS - SEMI_MINOR_AXIS * SEMI_MINOR_AXIS)
        / (SEMI_MINOR_AXIS * SEMI_MINOR_AXIS);

    // Gauss-Kruger 约定：中央子午线比例因子为 1.0（区别于 UTM 的 0.9996）。
    const SCALE_FACTOR: f64 = 1.0;
    const FALSE_EASTING: f64 = 500_000.0;
    const FALSE_NORTHING: f64 = 0.0;

    /// 将平面投影坐标（东向、北向，米）反算为 WGS84 经纬度。
    ///
    /// 纯函数，对所有有限输入均有定义；中央子午线以十进制度给出。
    pub fn tm_to_wgs84(easting: f64, northing: f64, central_meridian_deg: f64) -> GeoPoint {
        let arc = (northing - FALSE_NORTHING) / SCALE_FACTOR;
        let mu = arc
            / (SEMI_MAJOR_AXIS
                * (1.0
                    - ECC_SQ / 4.0
                    - 3.0 * ECC_SQ * ECC_SQ / 64.0
                    - 5.0 * ECC_SQ.powi(3) / 256.0));

        let e1 = (1.0 - (1.0 - ECC_SQ).sqrt()) / (1.0 + (1.0 - ECC_SQ).sqrt());
        let j1 = 3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0;
        let j2 = 21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0;
        let j3 = 151.0 * e1.powi(3) / 96.0;
        let j4 = 1097.0 * e1.powi(4) / 512.0;

        // 足点纬度：对应给定子午线弧长的纬度。
        let phi1 = mu
            + j1 * (2.0 * mu).sin()
            + j2 * (4.0 * mu).sin()
            + j3 * (6.0 * mu).sin()
            + j4 * (8.0 * mu).sin();

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let c1 = ECC_PRIME_SQ * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        // 卯酉圈与子午圈曲率半径。
        let n1 = SEMI_MAJOR_AXIS / (1.0 - ECC_SQ * sin_phi1 * sin_phi1).sqrt();
        let r1 = SEMI_MAJOR_AXIS * (1.0 - ECC_SQ)
            / (1.0 - ECC_SQ * sin_phi1 * sin_phi1).powf(1.5);
        let d = (easting - FALSE_EASTING) / (n1 * SCALE_FACTOR);

        let lat_rad = phi1
            - (n1 * tan_phi1 / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ECC_PRIME_SQ)
                        * d.powi(4)
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * ECC_PRIME_SQ
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);
        let lon_rad = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ECC_PRIME_SQ
                + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / cos_phi1;

        GeoPoint {
            lat: lat_rad.to_degrees(),
            lon: central_meridian_deg + lon_rad.to_degrees(),
        }
    }

    /// 经纬度范围，供宿主定位视野（相机）时估算整体覆盖区域。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct GeoBounds {
        min: GeoPoint,
        max: GeoPoint,
    }

    impl GeoBounds {
        #[inline]
        pub fn empty() -> Self {
            Self {
                min: GeoPoint::new(f64::INFINITY, f64::INFINITY),
                max: GeoPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.lat > self.max.lat || self.min.lon > self.max.lon
        }

        #[inline]
        pub fn min(&self) -> GeoPoint {
            self.min
        }

        #[inline]
        pub fn max(&self) -> GeoPoint {
            self.max
        }

        pub fn include(&mut self, point: GeoPoint) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            self.min.lat = self.min.lat.min(point.lat);
            self.min.lon = self.min.lon.min(point.lon);
            self.max.lat = self.max.lat.max(point.lat);
            self.max.lon = self.max.lon.max(point.lon);
        }

        #[inline]
        pub fn center(&self) -> GeoPoint {
            debug_assert!(!self.is_empty());
            GeoPoint::new(
                (self.min.lat + self.max.lat) * 0.5,
                (self.min.lon + self.max.lon) * 0.5,
            )
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn equator_on_central_meridian_maps_back_exactly() {
            let geo = tm_to_wgs84(500_000.0, 0.0, 30.0);
            assert!(geo.lat.abs() < 1e-9, "赤道处纬度应为 0，实际为 {}", geo.lat);
            assert!((geo.lon - 30.0).abs() < 1e-9);
        }

        #[test]
        fn footpoint_latitude_matches_reference() {
            // 东向坐标落在假东上时 D = 0，经度应精确等于中央子午线。
            let geo = tm_to_wgs84(500_000.0, 4_500_000.0, 30.0);
            assert!((geo.lat - 40.634_640_676_874_75).abs() < 1e-9);
            assert!((geo.lon - 30.0).abs() < 1e-12);
        }

        #[test]
        fn offset_point_matches_reference() {
            let geo = tm_to_wgs84(501_000.0, 4_501_000.0, 30.0);
            assert!((geo.lat - 40.643_645_272_645_24).abs() < 1e-9);
            assert!((geo.lon - 30.011_822_190_703_953).abs() < 1e-9);
        }

        #[test]
        fn longitude_offset_is_symmetric_about_central_meridian() {
            let east = tm_to_wgs84(510_000.0, 4_500_000.0, 30.0);
            let west = tm_to_wgs84(490_000.0, 4_500_000.0, 30.0);
            assert!((east.lat - west.lat).abs() < 1e-9);
            assert!(((east.lon - 30.0) + (west.lon - 30.0)).abs() < 1e-9);
        }

        #[test]
        fn latitude_increases_with_northing() {
            let south = tm_to_wgs84(500_000.0, 4_000_000.0, 27.0);
            let north = tm_to_wgs84(500_000.0, 5_000_000.0, 27.0);
            assert!(north.lat > south.lat);
            assert!((north.lat - 45.135_473_785_551_34).abs() < 1e-9);
        }

        #[test]
        fn geo_bounds_accumulates_points() {
            let mut bounds = GeoBounds::empty();
            assert!(bounds.is_empty());

            bounds.include(GeoPoint::new(40.0, 29.5));
            bounds.include(GeoPoint::new(41.0, 30.5));
            bounds.include(GeoPoint::new(40.5, 30.0));

            assert!(!bounds.is_empty());
            assert!((bounds.min().lat - 40.0).abs() < 1e-12);
            assert!((bounds.max().lon - 30.5).abs() < 1e-12);
            let center = bounds.center();
            assert!((center.lat - 40.5).abs() < 1e-12);
            assert!((center.lon - 30.0).abs() < 1e-12);
        }
    }
}

pub mod document {
    use std::collections::HashMap;

    use serde::{Deserialize, Serialize};

    use crate::geometry::{Bounds2D, Point2};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EntityId(u64);

    impl EntityId {
        #[inline]
        pub fn new(raw: u64) -> Self {
            Self(raw)
        }

        /// 提供原始数值，便于序列化或日志输出。
        #[inline]
        pub fn get(self) -> u64 {
            self.0
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Layer {
        pub name: String,
        pub is_visible: bool,
    }

    impl Layer {
        #[inline]
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                is_visible: true,
            }
        }
    }

    /// 图纸实体。每个变体只携带自身的几何载荷，图层名与 ACI 颜色索引
    /// 在构造时即归实体所有；颜色语义（调色板解析）属于渲染侧。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub enum Entity {
        Line(Line),
        Polyline(Polyline),
        Circle(Circle),
        Arc(Arc),
        Text(Text),
    }

    impl Entity {
        #[inline]
        pub fn layer_name(&self) -> &str {
            match self {
                Entity::Line(line) => &line.layer,
                Entity::Polyline(polyline) => &polyline.layer,
                Entity::Circle(circle) => &circle.layer,
                Entity::Arc(arc) => &arc.layer,
                Entity::Text(text) => &text.layer,
            }
        }

        #[inline]
        pub fn color(&self) -> i32 {
            match self {
                Entity::Line(line) => line.color,
                Entity::Polyline(polyline) => polyline.color,
                Entity::Circle(circle) => circle.color,
                Entity::Arc(arc) => arc.color,
                Entity::Text(text) => text.color,
            }
        }

        /// DWG 实体类型名，用于日志与摘要输出。
        #[inline]
        pub fn kind_name(&self) -> &'static str {
            match self {
                Entity::Line(_) => "LINE",
                Entity::Polyline(_) => "LWPOLYLINE",
                Entity::Circle(_) => "CIRCLE",
                Entity::Arc(_) => "ARC",
                Entity::Text(_) => "TEXT",
            }
        }

        /// 计算实体的图纸空间范围；文本退化为插入点，圆弧按整圆估算。
        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            match self {
                Entity::Line(line) => {
                    bounds.include_point(line.start);
                    bounds.include_point(line.end);
                }
                Entity::Polyline(polyline) => {
                    for vertex in &polyline.vertices {
                        bounds.include_point(*vertex);
                    }
                }
                Entity::Circle(circle) => {
                    let radius = circle.radius.abs();
                    let center = circle.center;
                    bounds.include_point(Point2::new(center.x() - radius, center.y() - radius));
                    bounds.include_point(Point2::new(center.x() + radius, center.y() + radius));
                }
                Entity::Arc(arc) => {
                    let radius = arc.radius.abs();
                    let center = arc.center;
                    bounds.include_point(Point2::new(center.x() - radius, center.y() - radius));
                    bounds.include_point(Point2::new(center.x() + radius, center.y() + radius));
                }
                Entity::Text(text) => {
                    bounds.include_point(text.insert);
                }
            }
            if bounds.is_empty() { None } else { Some(bounds) }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Line {
        pub start: Point2,
        pub end: Point2,
        pub color: i32,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Polyline {
        pub vertices: Vec<Point2>,
        pub is_closed: bool,
        pub color: i32,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Circle {
        pub center: Point2,
        pub radius: f64,
        pub color: i32,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Arc {
        pub center: Point2,
        pub radius: f64,
        pub start_angle: f64,
        pub end_angle: f64,
        pub color: i32,
        pub layer: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Text {
        pub insert: Point2,
        pub content: String,
        pub height: f64,
        pub rotation: f64,
        pub color: i32,
        pub layer: String,
    }

    /// 图纸文档：有序实体序列加图层表。由解码器产出，提取器只读借用，
    /// 调用结束后不保留任何引用。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Document {
        layers: HashMap<String, Layer>,
        entities: Vec<(EntityId, Entity)>,
        next_entity_id: u64,
    }

    impl Document {
        pub fn new() -> Self {
            let mut doc = Self::default();
            doc.ensure_layer("0");
            doc
        }

        pub fn ensure_layer(&mut self, name: impl AsRef<str>) {
            let key = name.as_ref();
            self.layers
                .entry(key.to_string())
                .or_insert_with(|| Layer::new(key));
        }

        pub fn add_line(
            &mut self,
            start: Point2,
            end: Point2,
            color: i32,
            layer: impl Into<String>,
        ) -> EntityId {
            let layer = layer.into();
            self.ensure_layer(&layer);
            let id = self.next_id();
            self.entities.push((
                id,
                Entity::Line(Line {
                    start,
                    end,
                    color,
                    layer,
                }),
            ));
            id
        }

        pub fn add_polyline<I>(
            &mut self,
            vertices: I,
            is_closed: bool,
            color: i32,
            layer: impl Into<String>,
        ) -> EntityId
        where
            I: IntoIterator<Item = Point2>,
        {
            let layer = layer.into();
            self.ensure_layer(&layer);
            let collected: Vec<Point2> = vertices.into_iter().collect();
            let id = self.next_id();
            self.entities.push((
                id,
                Entity::Polyline(Polyline {
                    vertices: collected,
                    is_closed,
                    color,
                    layer,
                }),
            ));
            id
        }

        pub fn add_circle(
            &mut self,
            center: Point2,
            radius: f64,
            color: i32,
            layer: impl Into<String>,
        ) -> EntityId {
            let layer = layer.into();
            self.ensure_layer(&layer);
            let id = self.next_id();
            self.entities.push((
                id,
                Entity::Circle(Circle {
                    center,
                    radius,
                    color,
                    layer,
                }),
            ));
            id
        }

        pub fn add_arc(
            &mut self,
            center: Point2,
            radius: f64,
            start_angle: f64,
            end_angle: f64,
            color: i32,
            layer: impl Into<String>,
        ) -> EntityId {
            let layer = layer.into();
            self.ensure_layer(&layer);
            let id = self.next_id();
            self.entities.push((
                id,
                Entity::Arc(Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    color,
                    layer,
                }),
            ));
            id
        }

        pub fn add_text(
            &mut self,
            insert: Point2,
            content: impl Into<String>,
            height: f64,
            rotation: f64,
            color: i32,
            layer: impl Into<String>,
        ) -> EntityId {
            let layer = layer.into();
            self.ensure_layer(&layer);
            let id = self.next_id();
            self.entities.push((
                id,
                Entity::Text(Text {
                    insert,
                    content: content.into(),
                    height,
                    rotation,
                    color,
                    layer,
                }),
            ));
            id
        }

        pub fn layers(&self) -> impl Iterator<Item = &Layer> {
            self.layers.values()
        }

        #[inline]
        pub fn entities(&self) -> impl Iterator<Item = &(EntityId, Entity)> {
            self.entities.iter()
        }

        pub fn entity(&self, id: EntityId) -> Option<&Entity> {
            self.entities.iter().find_map(|(entity_id, entity)| {
                if entity_id.get() == id.get() {
                    Some(entity)
                } else {
                    None
                }
            })
        }

        #[inline]
        pub fn entity_bounds(&self, id: EntityId) -> Option<Bounds2D> {
            self.entity(id).and_then(Entity::bounds)
        }

        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            let mut has = false;
            for (_, entity) in &self.entities {
                if let Some(entity_bounds) = entity.bounds() {
                    bounds.include_bounds(&entity_bounds);
                    has = true;
                }
            }
            if has { Some(bounds) } else { None }
        }

        #[inline]
        fn next_id(&mut self) -> EntityId {
            let id = self.next_entity_id;
            self.next_entity_id += 1;
            EntityId(id)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::geometry::Point2;
        use std::f64::consts::FRAC_PI_2;

        #[test]
        fn document_stores_entities_in_order() {
            let mut doc = Document::new();
            let line_id = doc.add_line(
                Point2::new(4_500_000.0, 500_000.0),
                Point2::new(4_501_000.0, 501_000.0),
                1,
                "Roads",
            );
            let polyline_id = doc.add_polyline(
                [
                    Point2::new(0.0, 0.0),
                    Point2::new(2.0, 2.0),
                    Point2::new(4.0, 0.0),
                ],
                false,
                3,
                "Parcels",
            );
            let circle_id = doc.add_circle(Point2::new(5.0, 5.0), 2.0, 4, "GEOM");
            let arc_id = doc.add_arc(Point2::new(5.0, 0.0), 3.5, 0.0, FRAC_PI_2, 5, "GEOM");
            let text_id = doc.add_text(Point2::new(1.0, 1.0), "101/5", 2.5, 0.0, 2, "Parcels");

            assert_eq!(line_id.get(), 0);
            assert_eq!(polyline_id.get(), 1);
            assert_eq!(circle_id.get(), 2);
            assert_eq!(arc_id.get(), 3);
            assert_eq!(text_id.get(), 4);
            assert_eq!(doc.entities().count(), 5);

            let layers: Vec<_> = doc.layers().map(|l| l.name.clone()).collect();
            assert!(layers.contains(&"0".to_string()));
            assert!(layers.contains(&"Roads".to_string()));
            assert!(layers.contains(&"Parcels".to_string()));
            assert!(layers.contains(&"GEOM".to_string()));

            match doc.entity(line_id) {
                Some(Entity::Line(line)) => {
                    assert_eq!(line.layer, "Roads");
                    assert_eq!(line.color, 1);
                    assert!((line.start.x() - 4_500_000.0).abs() < f64::EPSILON);
                }
                other => panic!("实体查找结果异常: {other:?}"),
            }

            let circle = doc.entity(circle_id).expect("圆实体缺失");
            assert_eq!(circle.layer_name(), "GEOM");
            assert_eq!(circle.color(), 4);
            assert_eq!(circle.kind_name(), "CIRCLE");

            match doc.entity(text_id) {
                Some(Entity::Text(text)) => {
                    assert_eq!(text.content, "101/5");
                    assert_eq!(text.color, 2);
                }
                _ => panic!("期望文本实体"),
            }
        }

        #[test]
        fn default_layer_is_registered() {
            let doc = Document::new();
            let layers: Vec<_> = doc.layers().map(|l| l.name.as_str()).collect();
            assert_eq!(layers, vec!["0"]);
            assert!(doc.layers().all(|l| l.is_visible));
        }

        #[test]
        fn document_bounds_cover_all_entities() {
            let mut doc = Document::new();
            assert!(doc.bounds().is_none());

            doc.add_line(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 7, "0");
            let text_id = doc.add_text(Point2::new(20.0, -5.0), "edge", 2.0, 0.0, 7, "0");

            let bounds = doc.bounds().expect("文档范围缺失");
            assert!((bounds.min().x() - 0.0).abs() < 1e-12);
            assert!((bounds.min().y() + 5.0).abs() < 1e-12);
            assert!((bounds.max().x() - 20.0).abs() < 1e-12);

            let text_bounds = doc.entity_bounds(text_id).expect("文本范围缺失");
            assert!((text_bounds.min().x() - text_bounds.max().x()).abs() < 1e-12);
        }

        #[test]
        fn empty_polyline_has_no_bounds() {
            let mut doc = Document::new();
            let id = doc.add_polyline(std::iter::empty(), false, 3, "Parcels");
            assert!(doc.entity_bounds(id).is_none());
        }
    }
}
