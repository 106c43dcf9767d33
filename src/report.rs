use {
    crate::{
        rotation::{Rotation, RotationGroup},
        solver::{Solution, Solutions},
    },
    log::warn,
    nanoserde::{DeJson, SerJson},
    rustc_hash::FxHashSet,
    std::fmt,
};

/// Turning the whole frame a quarter about its long axis, or end over end,
/// leaves a solved frame solved; each arrangement is found once per turn.
pub const FRAME_SYMMETRY_ORDER: usize = 8;

pub struct Report<'a> {
    solutions: &'a Solutions,
    distinct: usize,
}

#[derive(SerJson, DeJson, PartialEq, Debug)]
struct JsonReport {
    total: usize,
    unique: usize,
    solutions: Vec<Vec<String>>,
}

impl<'a> Report<'a> {
    pub fn new(solutions: &'a Solutions, group: &RotationGroup) -> Self {
        let distinct = distinct_arrangements(solutions, &group.frame_symmetries());
        let report = Self {
            solutions,
            distinct,
        };

        if report.total() % FRAME_SYMMETRY_ORDER != 0 {
            warn!(
                "{} solutions is not a multiple of {FRAME_SYMMETRY_ORDER}",
                report.total()
            );
        }
        if report.unique() != distinct {
            warn!(
                "unique count {} disagrees with {distinct} arrangements up to frame symmetry",
                report.unique()
            );
        }

        report
    }

    pub fn total(&self) -> usize {
        self.solutions.len()
    }

    pub fn unique(&self) -> usize {
        self.total() / FRAME_SYMMETRY_ORDER
    }

    pub fn distinct_arrangements(&self) -> usize {
        self.distinct
    }

    pub fn to_json(&self) -> String {
        JsonReport {
            total: self.total(),
            unique: self.unique(),
            solutions: self
                .solutions
                .iter()
                .map(|s| s.views().iter().map(ToString::to_string).collect())
                .collect(),
        }
        .serialize_json()
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total solutions: {}", self.total())?;
        writeln!(f, "unique solutions: {}", self.unique())?;
        for solution in self.solutions.iter() {
            writeln!(f, "{solution}")?;
        }
        Ok(())
    }
}

/// Number of orbits of `solutions` under `symmetries` applied to every cube.
pub fn distinct_arrangements(solutions: &[Solution], symmetries: &[Rotation]) -> usize {
    let mut seen = FxHashSet::default();
    let mut orbits = 0;

    for solution in solutions {
        if seen.contains(solution) {
            continue;
        }
        orbits += 1;
        seen.extend(symmetries.iter().map(|r| solution.transformed(r)));
    }

    orbits
}

#[cfg(test)]
fn known_solutions() -> (Solutions, RotationGroup) {
    let group = RotationGroup::generate();
    let solutions =
        crate::solver::Solver::new(crate::cube::sources().unwrap(), &group).solve();
    (solutions, group)
}

#[cfg(test)]
#[test_log::test]
fn test_known_report() {
    let (solutions, group) = known_solutions();
    let report = Report::new(&solutions, &group);

    assert_eq!(report.total(), 8);
    assert_eq!(report.unique(), 1);
    assert_eq!(report.distinct_arrangements(), report.unique());

    let text = report.to_string();
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2 + 8);
    assert_eq!(lines[0], "total solutions: 8");
    assert_eq!(lines[1], "unique solutions: 1");
    assert_eq!(lines[2], "bgyyyr, ryrbyg, ybgrgb, grbgry");
    assert_eq!(lines[9], "ybyryg, brrgyy, rygbgb, ggbyrr");
}

#[test]
fn test_frame_symmetry_maps_solutions_to_solutions() {
    let (solutions, group) = known_solutions();
    let all = solutions.iter().collect::<FxHashSet<_>>();

    for solution in solutions.iter() {
        let orbit = group
            .frame_symmetries()
            .iter()
            .map(|r| solution.transformed(r))
            .collect::<FxHashSet<_>>();

        assert_eq!(orbit.len(), FRAME_SYMMETRY_ORDER);
        assert!(orbit.iter().all(|s| all.contains(s)));
    }
}

#[test]
fn test_distinct_arrangements_without_symmetry() {
    let (solutions, _) = known_solutions();

    assert_eq!(
        distinct_arrangements(&solutions, &[Rotation::IDENTITY]),
        solutions.len()
    );
    assert_eq!(distinct_arrangements(&[], &[Rotation::IDENTITY]), 0);
}

#[test]
fn test_json_report() {
    let (solutions, group) = known_solutions();
    let json = Report::new(&solutions, &group).to_json();

    let parsed = JsonReport::deserialize_json(&json).unwrap();

    assert_eq!(parsed.total, 8);
    assert_eq!(parsed.unique, 1);
    assert_eq!(parsed.solutions.len(), 8);
    assert_eq!(parsed.solutions[0], ["bgyyyr", "ryrbyg", "ybgrgb", "grbgry"]);
}

#[test]
fn test_full_text_report() {
    let (solutions, group) = known_solutions();

    assert_eq!(
        Report::new(&solutions, &group).to_string(),
        "total solutions: 8\n\
         unique solutions: 1\n\
         bgyyyr, ryrbyg, ybgrgb, grbgry\n\
         byygyr, rbyyrg, yrgbgb, ggrrby\n\
         grybyy, ygrryb, bbgygr, rybgrg\n\
         gbyryy, yrygrb, bygbgr, rgrybg\n\
         rgyyyb, gyybrr, bbgrgy, yrrgbg\n\
         ryygyb, gbryyr, brgbgy, ygbrrg\n\
         yrybyg, bgyrry, rbgygb, gyrgbr\n\
         ybyryg, brrgyy, rygbgb, ggbyrr\n"
    );
}
