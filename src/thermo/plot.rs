//! # 自由能台阶图
//!
//! 使用 `plotters` 绘制 OER 自由能台阶图，可同时画多个电位。
//! 输出格式按扩展名选择：`.svg` 为矢量图，其余为 PNG。
//!
//! ## 依赖关系
//! - 被 `commands/free_energy.rs` 调用
//! - 使用 `thermo/che.rs` 的 FreeEnergyProfile

use super::che::{FreeEnergyProfile, STATE_LABELS};
use crate::error::{OerflowError, Result};

use plotters::prelude::*;
use std::path::Path;

const PALETTE: [RGBColor; 4] = [
    RGBColor(0, 102, 204),
    RGBColor(204, 51, 51),
    RGBColor(51, 153, 51),
    RGBColor(153, 102, 0),
];

/// 台阶横线的半宽（以状态间距为 1 计）
const HALF_WIDTH: f64 = 0.3;

/// 生成台阶图
pub fn generate_step_diagram(
    profiles: &[FreeEnergyProfile],
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
) -> Result<()> {
    if profiles.is_empty() {
        return Err(OerflowError::InvalidArgument(
            "Nothing to plot".to_string(),
        ));
    }

    let use_svg = output_path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_chart(&root, profiles, title)?;
        root.present()
            .map_err(|e| OerflowError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_chart(&root, profiles, title)?;
        root.present()
            .map_err(|e| OerflowError::Other(e.to_string()))?;
    }
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    profiles: &[FreeEnergyProfile],
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| OerflowError::Other(format!("{:?}", e)))?;

    let all_levels: Vec<f64> = profiles.iter().flat_map(|p| p.levels()).collect();
    let y_min = all_levels.iter().cloned().fold(f64::MAX, f64::min);
    let y_max = all_levels.iter().cloned().fold(f64::MIN, f64::max);
    let pad = ((y_max - y_min) * 0.1).max(0.2);

    let n = STATE_LABELS.len();
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), (y_min - pad)..(y_max + pad))
        .map_err(|e| OerflowError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| {
            let i = x.round();
            if (x - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < n {
                STATE_LABELS[i as usize].to_string()
            } else {
                String::new()
            }
        })
        .y_desc("ΔG (eV)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| OerflowError::Other(format!("{:?}", e)))?;

    for (k, profile) in profiles.iter().enumerate() {
        let color = PALETTE[k % PALETTE.len()];
        let levels = profile.levels();

        // 台阶
        chart
            .draw_series(levels.iter().enumerate().map(|(i, &g)| {
                let x = i as f64;
                PathElement::new(
                    vec![(x - HALF_WIDTH, g), (x + HALF_WIDTH, g)],
                    color.stroke_width(3),
                )
            }))
            .map_err(|e| OerflowError::Other(format!("{:?}", e)))?
            .label(format!("U = {:.2} V", profile.potential))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
            });

        // 台阶之间的连线
        chart
            .draw_series(levels.windows(2).enumerate().map(|(i, w)| {
                let x = i as f64;
                PathElement::new(
                    vec![(x + HALF_WIDTH, w[0]), (x + 1.0 - HALF_WIDTH, w[1])],
                    color.mix(0.5).stroke_width(1),
                )
            }))
            .map_err(|e| OerflowError::Other(format!("{:?}", e)))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| OerflowError::Other(format!("{:?}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profiles_rejected() {
        let err = generate_step_diagram(&[], Path::new("unused.svg"), "OER", 800, 600)
            .unwrap_err();
        assert!(matches!(err, OerflowError::InvalidArgument(_)));
    }

    #[test]
    fn test_svg_step_diagram_written() {
        use crate::thermo::che::{Corrections, SpeciesEnergies};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oer.svg");
        let e = SpeciesEnergies {
            slab: -40.0,
            oh: -50.0,
            o: -45.0,
            ooh: -55.0,
            h2o: -14.0,
            h2: -7.0,
        };
        let profile = FreeEnergyProfile::new(&e, &Corrections::default(), 0.0);

        generate_step_diagram(&[profile], &path, "OER on Ni(111)", 800, 600).unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
