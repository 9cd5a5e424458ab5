/// Line-based mesh text format
///
/// ```text
/// <x> <y> <z>        one line per point
/// ...
///                    exactly one blank line
/// <i1> <i2> <i3>     one line per triangle
/// ...
/// ```
use std::fmt::Write as _;

use nom::{
    character::complete::{space0, space1, u32 as index},
    combinator::all_consuming,
    number::complete::double,
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Geometry, Point, TriangleIndices};

/// Parse mesh text into a validated geometry
///
/// Leading and trailing whitespace is ignored. The point and triangle
/// sections must be separated by exactly one blank line.
pub fn parse_mesh(text: &str) -> Result<Geometry> {
    let text = text.replace("\r\n", "\n");
    let skipped = text[..text.len() - text.trim_start().len()].matches('\n').count();
    let lines: Vec<&str> = text.trim().lines().collect();

    let blanks: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim().is_empty())
        .map(|(n, _)| n)
        .collect();
    let &[separator] = blanks.as_slice() else {
        return Err(Error::format(
            0,
            format!(
                "expected a single blank line between points and triangles, found {}",
                blanks.len()
            ),
        ));
    };

    let first_line = skipped + 1;
    let points = parse_section(&lines[..separator], first_line, parse_point)?;
    let triangles = parse_section(
        &lines[separator + 1..],
        first_line + separator + 1,
        parse_triangle,
    )?;

    Geometry::new(points, triangles).map_err(|e| match e {
        Error::InvalidArgument(message) => Error::format(0, message),
        other => other,
    })
}

/// Render points and triangles as mesh text
pub fn write_mesh(
    points: impl IntoIterator<Item = Point>,
    triangles: impl IntoIterator<Item = TriangleIndices>,
) -> String {
    let mut out = String::new();
    for p in points {
        let _ = writeln!(out, "{} {} {}", p.x, p.y, p.z);
    }
    out.push('\n');
    for [a, b, c] in triangles {
        let _ = writeln!(out, "{a} {b} {c}");
    }
    out
}

fn parse_section<T>(
    lines: &[&str],
    first_line: usize,
    parser: fn(&str) -> IResult<&str, T>,
) -> Result<Vec<T>> {
    lines
        .iter()
        .enumerate()
        .map(|(offset, &line)| match all_consuming(parser)(line) {
            Ok((_, item)) => Ok(item),
            Err(e) => Err(Error::format(
                first_line + offset,
                format!("cannot parse {line:?}: {e:?}"),
            )),
        })
        .collect()
}

fn parse_point(input: &str) -> IResult<&str, Point> {
    let (input, _) = space0(input)?;
    let (input, x) = double(input)?;
    let (input, _) = space1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = space1(input)?;
    let (input, z) = double(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Point::new(x, y, z)))
}

fn parse_triangle(input: &str) -> IResult<&str, TriangleIndices> {
    let (input, _) = space0(input)?;
    let (input, a) = index(input)?;
    let (input, _) = space1(input)?;
    let (input, b) = index(input)?;
    let (input, _) = space1(input)?;
    let (input, c) = index(input)?;
    let (input, _) = space0(input)?;
    Ok((input, [a, b, c]))
}
