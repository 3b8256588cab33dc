//! Structural repair of genotypes after shuffling, crossover or mutation.

use crate::genotype::{is_separator, Allele, AlleleMapping, Genotype, SegmentLayout};
use std::collections::HashSet;

/// Moves every break instance back into the segment of its day and santa.
pub struct RepairOperation {
    layout: SegmentLayout,
    /// Expected genotype length
    genotype_length: usize,
}

impl RepairOperation {
    /// Create a repair operation for the given layout and allele universe.
    pub fn new(layout: SegmentLayout, mapping: &AlleleMapping) -> Self {
        RepairOperation {
            layout,
            genotype_length: mapping.len() + layout.number_of_separators(),
        }
    }

    /// Restore day binding in place.
    ///
    /// Misplaced break instances are removed and appended to the end of their
    /// target segment in their original relative order. Every other allele
    /// keeps its relative order, so segments of regular visits are unchanged.
    pub fn repair(&self, genotype: &mut Genotype, mapping: &AlleleMapping) {
        debug_assert_eq!(
            genotype.len(),
            self.genotype_length,
            "genotype does not hold the expected allele universe"
        );

        let segments = genotype.segment_indices();

        // Misplaced break instances with their target segment
        let misplaced: Vec<(Allele, usize)> = genotype
            .alleles()
            .iter()
            .zip(&segments)
            .filter_map(|(&allele, &segment)| {
                let binding = mapping.binding(allele)?;
                let target = self.layout.segment(binding.day, binding.santa);
                (target != segment).then_some((allele, target))
            })
            .collect();

        if misplaced.is_empty() {
            return;
        }

        let moved: HashSet<Allele> = misplaced.iter().map(|&(allele, _)| allele).collect();
        let mut repaired = Vec::with_capacity(genotype.len());
        let mut segment = 0;

        for &allele in genotype.alleles() {
            if moved.contains(&allele) {
                continue;
            }
            if is_separator(allele) {
                Self::append_bound(&mut repaired, &misplaced, segment);
                segment += 1;
            }
            repaired.push(allele);
        }
        Self::append_bound(&mut repaired, &misplaced, segment);

        debug_assert_eq!(repaired.len(), genotype.len());
        genotype.alleles_mut().copy_from_slice(&repaired);
    }

    /// Repair a batch of genotypes.
    pub fn repair_all<'a, I>(&self, genotypes: I, mapping: &AlleleMapping)
    where
        I: IntoIterator<Item = &'a mut Genotype>,
    {
        for genotype in genotypes {
            self.repair(genotype, mapping);
        }
    }

    /// Check the day binding postcondition without modifying the genotype.
    pub fn is_repaired(&self, genotype: &Genotype, mapping: &AlleleMapping) -> bool {
        genotype
            .alleles()
            .iter()
            .zip(genotype.segment_indices())
            .all(|(&allele, segment)| match mapping.binding(allele) {
                Some(binding) => self.layout.segment(binding.day, binding.santa) == segment,
                None => true,
            })
    }

    fn append_bound(target: &mut Vec<Allele>, misplaced: &[(Allele, usize)], segment: usize) {
        target.extend(
            misplaced
                .iter()
                .filter(|&&(_, s)| s == segment)
                .map(|&(allele, _)| allele),
        );
    }
}
