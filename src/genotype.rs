//! Chromosome encoding: alleles, genotypes, the allele-to-visit mapping and
//! the segment layout that assigns positions to (day, santa) pairs.
//!
//! A genotype is a flat permutation of visit alleles (`>= 0`) and separator
//! alleles (`< 0`). The `days * max_santas - 1` separators cut the sequence into
//! one segment per (day, santa) pair, enumerated day-major.

use crate::error::{Error, Result};
use crate::problem::{OptimizationInput, VisitId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One symbol of a genotype.
pub type Allele = i32;

/// Returns true if the allele only delimits segments.
pub fn is_separator(allele: Allele) -> bool {
    allele < 0
}

/// Tagged view of an allele.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gene {
    Visit(Allele),
    Separator,
}

impl From<Allele> for Gene {
    fn from(allele: Allele) -> Self {
        if is_separator(allele) {
            Gene::Separator
        } else {
            Gene::Visit(allele)
        }
    }
}

/// Ordered sequence of alleles representing one candidate schedule.
///
/// Operators only ever reorder alleles, so the slice handed out by
/// [`Genotype::alleles_mut`] cannot change the length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genotype {
    alleles: Vec<Allele>,
}

impl Genotype {
    /// Create a genotype from an allele sequence.
    pub fn new(alleles: Vec<Allele>) -> Self {
        Genotype { alleles }
    }

    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    pub fn alleles_mut(&mut self) -> &mut [Allele] {
        &mut self.alleles
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    /// Iterate over the tagged view of the alleles.
    pub fn genes(&self) -> impl Iterator<Item = Gene> + '_ {
        self.alleles.iter().map(|&a| Gene::from(a))
    }

    /// Segment index of every position. Separators report the segment they close.
    pub fn segment_indices(&self) -> Vec<usize> {
        let mut segment = 0;
        self.genes()
            .map(|gene| match gene {
                Gene::Visit(_) => segment,
                Gene::Separator => {
                    segment += 1;
                    segment - 1
                }
            })
            .collect()
    }

    /// Check that both genotypes hold the same multiset of alleles.
    pub fn is_permutation_of(&self, other: &Genotype) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut lhs = self.alleles.clone();
        let mut rhs = other.alleles.clone();
        lhs.sort_unstable();
        rhs.sort_unstable();
        lhs == rhs
    }
}

impl From<Vec<Allele>> for Genotype {
    fn from(alleles: Vec<Allele>) -> Self {
        Genotype::new(alleles)
    }
}

/// Assignment of segments to (day, santa slot) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
    pub number_of_days: usize,
    pub max_number_of_santas: usize,
}

impl SegmentLayout {
    pub fn new(number_of_days: usize, max_number_of_santas: usize) -> Self {
        SegmentLayout {
            number_of_days,
            max_number_of_santas,
        }
    }

    pub fn number_of_segments(&self) -> usize {
        self.number_of_days * self.max_number_of_santas
    }

    /// Separators needed to cut a genotype into all segments.
    pub fn number_of_separators(&self) -> usize {
        self.number_of_segments().saturating_sub(1)
    }

    pub fn segment(&self, day: usize, santa: usize) -> usize {
        day * self.max_number_of_santas + santa
    }

    pub fn day_of(&self, segment: usize) -> usize {
        segment / self.max_number_of_santas
    }

    pub fn santa_of(&self, segment: usize) -> usize {
        segment % self.max_number_of_santas
    }
}

/// Day and santa slot a break instance must be scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBinding {
    pub day: usize,
    pub santa: usize,
}

/// Fixed lookup from every visit allele to the visit it stands for.
///
/// Regular visits map onto themselves. A break gets its own id as allele for
/// day 0 and a freshly minted allele for every further day, all resolving to
/// the break's visit id.
#[derive(Debug, Clone)]
pub struct AlleleMapping {
    /// Alleles in creation order, paired with their visit id
    entries: Vec<(Allele, VisitId)>,
    lookup: HashMap<Allele, VisitId>,
    bindings: HashMap<Allele, DayBinding>,
}

impl AlleleMapping {
    /// Build the allele universe of a problem instance.
    pub fn new(input: &OptimizationInput) -> Result<Self> {
        let mut entries = Vec::with_capacity(input.number_of_alleles());
        let mut bindings = HashMap::new();

        for visit in input.regular_visits() {
            entries.push((visit.id, visit.id));
        }

        let mut next_allele = input.visits.iter().map(|v| v.id).max().unwrap_or(0).max(0) + 1;
        for visit in input.breaks() {
            let santa = visit
                .santa_id
                .and_then(|id| input.santa_index(id))
                .ok_or_else(|| {
                    Error::InvalidInput(format!("break {} has no known owning santa", visit.id))
                })?;

            entries.push((visit.id, visit.id));
            bindings.insert(visit.id, DayBinding { day: 0, santa });
            for day in 1..input.days.len() {
                entries.push((next_allele, visit.id));
                bindings.insert(next_allele, DayBinding { day, santa });
                next_allele += 1;
            }
        }

        let lookup = entries.iter().copied().collect();
        Ok(AlleleMapping {
            entries,
            lookup,
            bindings,
        })
    }

    /// Resolve a visit allele to its visit id.
    pub fn visit_id(&self, allele: Allele) -> Option<VisitId> {
        self.lookup.get(&allele).copied()
    }

    /// Day binding of a break instance, `None` for regular visits.
    pub fn binding(&self, allele: Allele) -> Option<DayBinding> {
        self.bindings.get(&allele).copied()
    }

    /// The visit-allele universe in creation order.
    pub fn alleles(&self) -> impl Iterator<Item = Allele> + '_ {
        self.entries.iter().map(|&(allele, _)| allele)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Santa, Visit};

    #[test]
    fn test_segment_indices() {
        let genotype = Genotype::new(vec![3, -1, 4, 5, -2, 6]);
        assert_eq!(genotype.segment_indices(), vec![0, 0, 1, 1, 1, 2]);
    }

    #[test]
    fn test_layout_is_day_major() {
        let layout = SegmentLayout::new(2, 3);
        assert_eq!(layout.number_of_separators(), 5);
        assert_eq!(layout.segment(1, 2), 5);
        assert_eq!(layout.day_of(4), 1);
        assert_eq!(layout.santa_of(4), 1);
    }

    #[test]
    fn test_break_alleles_per_day() {
        let input = OptimizationInput::new(
            vec![Santa { id: 7 }],
            vec![
                Visit::new(0, 10, 1, 1),
                Visit::new_break(1, 10, 7),
                Visit::new(2, 10, 1, 1),
            ],
            vec![(0, 100), (200, 300), (400, 500)],
            vec![vec![0; 3]; 3],
        );
        let mapping = AlleleMapping::new(&input).unwrap();

        assert_eq!(mapping.len(), 5);
        assert_eq!(mapping.alleles().collect::<Vec<_>>(), vec![0, 2, 1, 3, 4]);
        assert_eq!(mapping.visit_id(3), Some(1));
        assert_eq!(mapping.visit_id(4), Some(1));
        assert_eq!(mapping.binding(4), Some(DayBinding { day: 2, santa: 0 }));
        assert_eq!(mapping.binding(0), None);
    }
}
