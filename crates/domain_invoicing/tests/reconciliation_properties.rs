//! Cross-crate properties: allocation results flowing through invoices and
//! balances over generated buildings

use core_kernel::Money;
use domain_allocation::{
    BillStore, CommonCostAllocationEngine, DistributionMethod, ElectricAllocationEngine,
    WaterAllocationEngine,
};
use domain_invoicing::{
    AdditionalCharge, BillRef, ChargeKind, CombinationItem, CombineRequest, InvoiceCombiner,
    PaymentLedger, UnitAdditionalData,
};
use proptest::prelude::*;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use test_utils::{
    amount_strategy, assert_charged_amount, assert_money_approx_eq, assert_money_sums_to,
    assert_money_zero, billing_month_strategy, common_request, floor_units_strategy, march_2025,
    positive_amount_strategy, positive_money_strategy, standard_building, standard_defaults,
    standard_floor, ElectricRequestBuilder, WaterRequestBuilder,
};

proptest! {
    #[test]
    fn water_bases_conserve_the_original_for_any_building(
        (_, units) in floor_units_strategy(8),
        total in positive_amount_strategy(),
        welfare in 0i64..50_000i64,
    ) {
        let defaults = standard_defaults();
        let bill = WaterAllocationEngine::new(&defaults)
            .calculate(
                &units,
                &WaterRequestBuilder::new(march_2025(), total)
                    .welfare_total(welfare)
                    .build(),
            )
            .unwrap();

        let base_sum: Money = bill.details.iter().map(|d| d.base_amount).sum();
        assert_money_approx_eq(base_sum, bill.original_amount(), dec!(0.01));
        for detail in &bill.details {
            assert_charged_amount(detail.charged_amount, detail.final_amount);
        }
    }

    #[test]
    fn common_allocation_distributes_the_whole_cost(
        (_, units) in floor_units_strategy(6),
        total in amount_strategy(),
        period in billing_month_strategy(),
        by_units in any::<bool>(),
    ) {
        let method = if by_units {
            DistributionMethod::ByUnits
        } else {
            DistributionMethod::ByResidents
        };
        let bill = CommonCostAllocationEngine::new()
            .calculate(&units, &common_request(period, "Maintenance", total, method))
            .unwrap();

        let allocated: Money = bill.details.iter().map(|d| d.amount).sum();
        assert_money_approx_eq(allocated, Money::from_i64(total), dec!(0.01));
        for detail in &bill.details {
            assert_charged_amount(detail.charged_amount, detail.amount);
        }
    }

    #[test]
    fn invoice_total_is_the_sum_of_its_parts(extra in positive_money_strategy()) {
        let units = standard_building();
        let defaults = standard_defaults();
        let mut store = BillStore::new();

        let water = WaterAllocationEngine::new(&defaults)
            .calculate(&units, &WaterRequestBuilder::new(march_2025(), 60_000).build())
            .unwrap();
        let water_id = store.record_water(water, false).unwrap();

        let common = CommonCostAllocationEngine::new()
            .calculate(
                &units,
                &common_request(march_2025(), "Cleaning", 15_000, DistributionMethod::ByUnits),
            )
            .unwrap();
        let common_id = store.record_common(common);

        let billed_unit = units[0].id;
        let mut unit_additional_data = HashMap::new();
        unit_additional_data.insert(
            billed_unit,
            UnitAdditionalData {
                charges: vec![AdditionalCharge {
                    kind: ChargeKind::Ordinary,
                    description: "Repair".to_string(),
                    amount: extra,
                }],
                memo: None,
            },
        );

        let combination = InvoiceCombiner::new(&store)
            .combine(
                &units,
                None,
                &CombineRequest {
                    name: "March notice".to_string(),
                    memo: None,
                    items: vec![
                        CombinationItem {
                            bill: BillRef::Water(water_id),
                            period: march_2025(),
                            description: None,
                        },
                        CombinationItem {
                            bill: BillRef::Common(common_id),
                            period: march_2025(),
                            description: None,
                        },
                    ],
                    unit_additional_data,
                },
            )
            .unwrap();

        let invoice = combination.invoice_for(billed_unit).unwrap();
        assert_money_sums_to(
            &[
                invoice.electric_amount,
                invoice.water_amount,
                invoice.common_amount,
                extra,
            ],
            invoice.total_amount,
        );
        assert_money_zero(invoice.carryover_total());

        // An ordinary extra charge reaches the cumulative billed tally.
        let total = invoice.total_amount;
        let mut ledger = PaymentLedger::new();
        ledger.register_combination(combination);
        prop_assert_eq!(ledger.unit_balance(billed_unit).billed, total);
    }
}

#[test]
fn standard_floor_flags_drive_electric_discounts() {
    let (floor, units) = standard_floor();
    let defaults = standard_defaults();

    let bill = ElectricAllocationEngine::new(&defaults)
        .calculate(
            &units,
            &ElectricRequestBuilder::new(floor, march_2025())
                .entry_full(march_2025(), 80_000, 4000, 0, 0)
                .equal_readings(&units, 100)
                .build(),
        )
        .unwrap();

    // 201 is the floor's only electric-welfare unit: pre-discount 84000 over
    // four equal readings gives base 21000, minus the whole 4000 input, plus
    // the default TV fee its subscription carries.
    let welfare = bill.detail_for(units[0].id).unwrap();
    assert_eq!(welfare.base_amount, Money::from_i64(21_000));
    assert_eq!(welfare.welfare_discount, Money::from_i64(4000));
    assert_eq!(welfare.final_amount, Money::from_i64(19_500));

    // 203 has no TV subscription, so Individual mode charges it nothing.
    let no_tv = bill.detail_for(units[2].id).unwrap();
    assert_money_zero(no_tv.tv_fee);
    assert_eq!(no_tv.final_amount, Money::from_i64(21_000));
}
