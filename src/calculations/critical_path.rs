use crate::error::ResolveError;
use crate::graph::ScheduleDag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalPath {
    /// Critical flag per task position.
    pub critical: Vec<bool>,
    /// Cumulative duration of the longest dependency chain.
    pub length_days: u64,
}

impl CriticalPath {
    /// Longest-path DP weighted by duration; ties are all critical.
    pub fn compute(dag: &ScheduleDag, durations: &[u32]) -> Result<Self, ResolveError> {
        let order = dag.stable_topological_order()?;
        let weight = |idx: usize| u64::from(durations[idx]);

        let mut longest_to = vec![0u64; dag.len()];
        for &idx in &order {
            let best_pred = dag
                .dependencies(idx)
                .iter()
                .map(|&dep| longest_to[dep])
                .max()
                .unwrap_or(0);
            longest_to[idx] = best_pred + weight(idx);
        }

        let mut longest_from = vec![0u64; dag.len()];
        for &idx in order.iter().rev() {
            let best_succ = dag
                .dependents(idx)
                .into_iter()
                .map(|succ| longest_from[succ])
                .max()
                .unwrap_or(0);
            longest_from[idx] = best_succ + weight(idx);
        }

        let length_days = longest_to.iter().copied().max().unwrap_or(0);
        let critical = (0..dag.len())
            .map(|idx| longest_to[idx] + longest_from[idx] - weight(idx) == length_days)
            .collect();

        Ok(Self {
            critical,
            length_days,
        })
    }
}
