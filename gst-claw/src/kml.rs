//! KML overlays of run inputs (domain, flag regions, gauges, fgmax grids)
//! for viewing next to map imagery.

use crate::error::{ClawError, Result};
use crate::gauge::Gauge;
use crate::rundata::RunData;
use log::info;
use std::path::{Path, PathBuf};

/// KML colors are `aabbggrr`
const DOMAIN_COLOR: &str = "ff0000ff";
const REGION_COLOR: &str = "ffffffff";
const FGMAX_COLOR: &str = "ff00ff00";
const GAUGE_COLOR: &str = "ff00ffff";

/// Longitudes outside [-180, 180] are shifted by 360 so map viewers draw them.
fn wrap_longitude(x: f64) -> f64 {
    if x > 180.0 {
        x - 360.0
    } else if x < -180.0 {
        x + 360.0
    } else {
        x
    }
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

fn document(name: &str, body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<kml xmlns=\"http://www.opengis.net/kml/2.2\">
<Document><name>{}</name>
{}</Document>
</kml>
",
        name, body
    )
}

/// A closed rectangle outline `[x1, x2, y1, y2]`.
pub fn box_kml(name: &str, extent: [f64; 4], color: &str) -> String {
    let [x1, x2, y1, y2] = extent;
    let (x1, x2) = (wrap_longitude(x1), wrap_longitude(x2));
    let corners = [(x1, y1), (x2, y1), (x2, y2), (x1, y2), (x1, y1)];
    let coordinates: Vec<String> = corners
        .iter()
        .map(|(x, y)| format!("{:.9},{:.9},0", x, y))
        .collect();
    let body = format!(
        "<Style id=\"outline\"><LineStyle><color>{}</color><width>2</width></LineStyle>
<PolyStyle><color>00000000</color></PolyStyle></Style>
<Placemark><name>{}</name><styleUrl>#outline</styleUrl>
<Polygon><outerBoundaryIs><LinearRing><coordinates>
{}
</coordinates></LinearRing></outerBoundaryIs></Polygon></Placemark>
",
        color,
        name,
        coordinates.join("\n")
    );
    document(name, &body)
}

/// One placemark per gauge.
pub fn gauges_kml(gauges: &[Gauge]) -> String {
    let mut body = format!(
        "<Style id=\"gauge\"><IconStyle><color>{}</color></IconStyle></Style>\n",
        GAUGE_COLOR
    );
    for gauge in gauges {
        body.push_str(&format!(
            "<Placemark><name>Gauge {}</name><description>t1 = {}, t2 = {}</description>
<styleUrl>#gauge</styleUrl><Point><coordinates>{:.9},{:.9},0</coordinates></Point></Placemark>
",
            gauge.id,
            gauge.t1,
            gauge.t2,
            wrap_longitude(gauge.x),
            gauge.y
        ));
    }
    document("Gauges", &body)
}

/// Render `Domain.kml`, one KML per flag region, `gauges.kml` and one KML
/// per fgmax grid as `(file name, text)` pairs.
pub fn input_kmls(rundata: &RunData) -> Vec<(String, String)> {
    let c = &rundata.clawdata;
    let mut files = vec![(
        "Domain.kml".to_string(),
        box_kml(
            "Computational domain",
            [c.lower[0], c.upper[0], c.lower[1], c.upper[1]],
            DOMAIN_COLOR,
        ),
    )];
    for region in &rundata.flagregions {
        files.push((
            format!("{}.kml", file_stem(&region.name)),
            box_kml(&region.name, region.spatial_region, REGION_COLOR),
        ));
    }
    if !rundata.gauges.is_empty() {
        files.push(("gauges.kml".to_string(), gauges_kml(&rundata.gauges)));
    }
    for (idx, fg) in rundata.fgmax_data.fgmax_grids.iter().enumerate() {
        let name = format!("fgmax{:04}", idx + 1);
        files.push((
            format!("{}.kml", name),
            box_kml(&name, [fg.x1, fg.x2, fg.y1, fg.y2], FGMAX_COLOR),
        ));
    }
    files
}

pub fn write_kmls(files: &[(String, String)], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| ClawError::io(dir, e))?;
    let mut written = Vec::with_capacity(files.len());
    for (name, text) in files {
        let path = dir.join(name);
        std::fs::write(&path, text).map_err(|e| ClawError::io(&path, e))?;
        info!("Wrote {:?}", path);
        written.push(path);
    }
    Ok(written)
}

/// Render and write the input overlays into `dir`.
pub fn write_input_kmls(rundata: &RunData, dir: &Path) -> Result<Vec<PathBuf>> {
    write_kmls(&input_kmls(rundata), dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag_region::FlagRegion;

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(200.0), -160.0);
        assert_eq!(wrap_longitude(-199.0), 161.0);
        assert_eq!(wrap_longitude(-155.0), -155.0);
    }

    #[test]
    fn test_box_kml_closes_ring() {
        let kml = box_kml("r", [-1.0, 1.0, -2.0, 2.0], REGION_COLOR);
        assert_eq!(kml.matches("-1.000000000,-2.000000000,0").count(), 2);
        assert!(kml.contains("<name>r</name>"));
    }

    #[test]
    fn test_write_input_kmls() {
        let mut rundata = RunData::default();
        rundata.flagregions = vec![FlagRegion::new(
            "Region Maui/6sec",
            (5, 5),
            (0.0, 1e9),
            [-156.85, -155.8, 20.5, 21.19],
        )];
        rundata.gauges = vec![Gauge::new(7760, -155.0553, 19.7308, 0.0, 1e10)];
        let dir = std::env::temp_dir().join(format!("gst-claw-kml-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let written = write_input_kmls(&rundata, &dir).unwrap();
        assert_eq!(written.len(), 3);
        assert!(dir.join("Region_Maui_6sec.kml").is_file());
        let gauges = std::fs::read_to_string(dir.join("gauges.kml")).unwrap();
        assert!(gauges.contains("Gauge 7760"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
